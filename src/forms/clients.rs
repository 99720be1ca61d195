use std::fs::File;
use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::client::{ClientContact, ClientStatus, ClientType, NewClient, UpdateClient};
use crate::domain::types::{ClientName, Cnpj, ContactEmail, PhoneNumber, SegmentName};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Default, Deserialize, Validate)]
/// Form data for registering a client.
pub struct AddClientForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub cnpj: String,
    /// `public` or `private`.
    #[serde(rename = "type")]
    pub client_type: String,
    pub status: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[validate(length(max = 2))]
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
}

/// Form data for editing a client; every field is submitted.
pub type SaveClientForm = AddClientForm;

fn parse_contact_email(value: Option<String>) -> Result<Option<ContactEmail>, FormError> {
    non_blank(value)
        .map(ContactEmail::new)
        .transpose()
        .map_err(|_| FormError::InvalidEmail)
}

fn parse_contact_phone(value: Option<String>) -> Result<Option<PhoneNumber>, FormError> {
    non_blank(value)
        .map(PhoneNumber::new)
        .transpose()
        .map_err(|_| FormError::InvalidPhoneNumber)
}

fn parse_segment(value: Option<String>) -> Result<Option<SegmentName>, FormError> {
    non_blank(value)
        .map(SegmentName::new)
        .transpose()
        .map_err(|_| FormError::InvalidSegment)
}

impl TryFrom<AddClientForm> for NewClient {
    type Error = FormError;

    fn try_from(form: AddClientForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let name = ClientName::new(form.name).map_err(|_| FormError::InvalidName)?;
        let cnpj = Cnpj::new(form.cnpj).map_err(|_| FormError::InvalidCnpj)?;
        let client_type: ClientType = form
            .client_type
            .parse()
            .map_err(|_| FormError::InvalidClientType)?;
        let status: ClientStatus = form.status.parse().map_err(|_| FormError::InvalidStatus)?;
        let segment = parse_segment(form.segment)?;
        let contact = ClientContact::new(
            form.address,
            form.city,
            form.state,
            form.contact_name,
            parse_contact_email(form.contact_email)?,
            parse_contact_phone(form.contact_phone)?,
        );

        Ok(NewClient::new(name, cnpj, client_type, status, segment, contact))
    }
}

impl TryFrom<SaveClientForm> for UpdateClient {
    type Error = FormError;

    /// Blank optional fields clear the stored value.
    fn try_from(form: SaveClientForm) -> Result<Self, Self::Error> {
        let new_client = NewClient::try_from(form)?;
        let contact = new_client.contact;

        Ok(UpdateClient {
            name: Some(new_client.name),
            cnpj: Some(new_client.cnpj),
            client_type: Some(new_client.client_type),
            status: Some(new_client.status),
            segment: Some(new_client.segment),
            address: Some(contact.address),
            city: Some(contact.city),
            state: Some(contact.state),
            contact_name: Some(contact.contact_name),
            contact_email: Some(contact.contact_email),
            contact_phone: Some(contact.contact_phone),
            user_roles: None,
        })
    }
}

#[derive(MultipartForm)]
pub struct UploadClientsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl UploadClientsForm {
    pub fn parse(&self) -> Result<Vec<NewClient>, FormError> {
        let file = File::open(self.csv.file.path()).map_err(|e| FormError::Csv(e.to_string()))?;
        parse_clients_csv(file)
    }
}

/// Reads clients from CSV with a header row.
///
/// Columns: `name,cnpj,type,status,segment,city,state,contact_name,
/// contact_email,contact_phone`; the first invalid row rejects the batch.
pub fn parse_clients_csv<R: Read>(reader: R) -> Result<Vec<NewClient>, FormError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut clients = Vec::new();
    for (index, record) in rdr.deserialize::<AddClientForm>().enumerate() {
        // Row 1 is the header.
        let row = index + 2;
        let form = record.map_err(|e| FormError::Row {
            row,
            source: Box::new(FormError::Csv(e.to_string())),
        })?;
        let client = NewClient::try_from(form).map_err(|e| FormError::Row {
            row,
            source: Box::new(e),
        })?;
        clients.push(client);
    }

    if clients.is_empty() {
        return Err(FormError::Csv("nenhum cliente encontrado".to_string()));
    }
    Ok(clients)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> AddClientForm {
        AddClientForm {
            name: "  Gama Alimentos ".into(),
            cnpj: "52.601.815/0001-20".into(),
            client_type: "private".into(),
            status: "prospect".into(),
            segment: Some("Alimentos".into()),
            contact_email: Some("".into()),
            contact_phone: Some("(11) 98765-4321".into()),
            ..AddClientForm::default()
        }
    }

    #[test]
    fn valid_form_builds_new_client() {
        let client = NewClient::try_from(form()).unwrap();
        assert_eq!(client.name.as_str(), "Gama Alimentos");
        assert_eq!(client.cnpj.digits(), "52601815000120");
        assert_eq!(client.contact.contact_email, None);
        assert_eq!(
            client.contact.contact_phone.unwrap().as_str(),
            "+5511987654321"
        );
    }

    #[test]
    fn invalid_cnpj_is_rejected() {
        let mut bad = form();
        bad.cnpj = "52.601.815/0001-21".into();
        assert!(matches!(NewClient::try_from(bad), Err(FormError::InvalidCnpj)));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut bad = form();
        bad.client_type = "mixed".into();
        assert!(matches!(
            NewClient::try_from(bad),
            Err(FormError::InvalidClientType)
        ));
    }

    #[test]
    fn save_form_clears_blank_contact_fields() {
        let update = UpdateClient::try_from(form()).unwrap();
        assert_eq!(update.contact_email, Some(None));
        assert_eq!(update.city, Some(None));
        assert_eq!(update.status, Some(ClientStatus::Prospect));
    }

    #[test]
    fn save_form_clears_blank_segment() {
        let mut blank = form();
        blank.segment = Some("  ".into());
        let update = UpdateClient::try_from(blank).unwrap();
        assert_eq!(update.segment, Some(None));

        let update = UpdateClient::try_from(form()).unwrap();
        assert_eq!(
            update.segment.flatten().map(SegmentName::into_inner).as_deref(),
            Some("Alimentos")
        );
    }

    #[test]
    fn csv_rows_are_parsed() {
        let csv = "name,cnpj,type,status,segment,city,state,contact_name,contact_email,contact_phone\n\
                   Delta SA,90.830.166/0001-28,public,active,Saúde,Recife,PE,Rui,rui@delta.com.br,\n\
                   Épsilon,13186091000143,private,prospect,,,,,,\n";
        let clients = parse_clients_csv(csv.as_bytes()).unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].client_type, ClientType::Public);
        assert_eq!(
            clients[0].contact.contact_email.as_ref().unwrap().as_str(),
            "rui@delta.com.br"
        );
        assert!(clients[1].segment.is_none());
    }

    #[test]
    fn csv_reports_first_bad_row() {
        let csv = "name,cnpj,type,status\n\
                   Delta SA,90.830.166/0001-28,public,active\n\
                   Zeta,123,private,active\n";
        let err = parse_clients_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, FormError::Row { row: 3, .. }));
        assert_eq!(err.to_string(), "linha 3: CNPJ inválido");
    }

    #[test]
    fn empty_csv_is_rejected() {
        let csv = "name,cnpj,type,status\n";
        assert!(matches!(
            parse_clients_csv(csv.as_bytes()),
            Err(FormError::Csv(_))
        ));
    }
}
