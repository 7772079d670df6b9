//! Command line surface of the desk

use clap::{Args, Parser, Subcommand};

use library_desk::models::{
    client::{ClientField, ClientStatus, IndividualField, OrganizationField},
    AddressField,
};

#[derive(Debug, Parser)]
#[command(name = "library-desk")]
#[command(about = "Front desk client for the library service", long_about = None)]
pub struct Cli {
    /// Library service base URL; overrides the configured one
    #[arg(long, global = true, env = "API_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the book catalogue
    Books,
    /// List clients
    Clients {
        /// active, inactive or all
        #[arg(long, default_value = "active")]
        status: ClientStatus,
    },
    /// List copies that can be loaned
    Copies,
    /// Loan a copy to a client
    Loan {
        #[arg(long = "client")]
        client_id: i32,
        #[arg(long = "copy")]
        copy_id: i32,
        /// Loan length in days; defaults to `loans.default_duration_days`
        #[arg(long)]
        days: Option<u32>,
    },
    /// Register a new client
    Register {
        #[command(subcommand)]
        kind: RegisterCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum RegisterCommands {
    /// Register a person (PF)
    Individual {
        #[command(flatten)]
        contact: ContactArgs,
        /// CPF, digits only
        #[arg(long, default_value = "")]
        cpf: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long)]
        middle_name: Option<String>,
        #[arg(long, default_value = "")]
        last_name: String,
        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        birth_date: String,
    },
    /// Register a company (PJ)
    Organization {
        #[command(flatten)]
        contact: ContactArgs,
        /// CNPJ, digits only
        #[arg(long, default_value = "")]
        cnpj: String,
        #[arg(long, default_value = "")]
        legal_name: String,
        #[arg(long)]
        trade_name: Option<String>,
    },
}

/// Contact and address flags shared by both client kinds.
///
/// Missing flags stay empty so local validation can list them all at once.
#[derive(Debug, Args)]
pub struct ContactArgs {
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub road: String,
    #[arg(long)]
    pub number: Option<String>,
    #[arg(long, default_value = "")]
    pub neighbourhood: String,
    #[arg(long, default_value = "")]
    pub city: String,
    #[arg(long, default_value = "")]
    pub state: String,
    #[arg(long, default_value = "")]
    pub zip_code: String,
    #[arg(long)]
    pub complement: Option<String>,
}

impl ContactArgs {
    fn into_fields(self) -> Vec<(ClientField, String)> {
        let mut fields = vec![
            (ClientField::Email, self.email),
            (ClientField::Phone, self.phone),
            (ClientField::Address(AddressField::Road), self.road),
            (ClientField::Address(AddressField::Neighbourhood), self.neighbourhood),
            (ClientField::Address(AddressField::City), self.city),
            (ClientField::Address(AddressField::State), self.state),
            (ClientField::Address(AddressField::ZipCode), self.zip_code),
        ];
        if let Some(number) = self.number {
            fields.push((ClientField::Address(AddressField::Number), number));
        }
        if let Some(complement) = self.complement {
            fields.push((ClientField::Address(AddressField::Complement), complement));
        }
        fields
    }
}

impl RegisterCommands {
    /// Draft edits the command stands for, in form order
    pub fn into_fields(self) -> Vec<(ClientField, String)> {
        match self {
            RegisterCommands::Individual {
                contact,
                cpf,
                first_name,
                middle_name,
                last_name,
                birth_date,
            } => {
                let mut fields = contact.into_fields();
                fields.push((ClientField::Individual(IndividualField::NationalId), cpf));
                fields.push((ClientField::Individual(IndividualField::FirstName), first_name));
                if let Some(middle_name) = middle_name {
                    fields.push((ClientField::Individual(IndividualField::MiddleName), middle_name));
                }
                fields.push((ClientField::Individual(IndividualField::LastName), last_name));
                fields.push((ClientField::Individual(IndividualField::BirthDate), birth_date));
                fields
            }
            RegisterCommands::Organization {
                contact,
                cnpj,
                legal_name,
                trade_name,
            } => {
                let mut fields = contact.into_fields();
                fields.push((ClientField::Organization(OrganizationField::NationalId), cnpj));
                fields.push((ClientField::Organization(OrganizationField::LegalName), legal_name));
                if let Some(trade_name) = trade_name {
                    fields.push((ClientField::Organization(OrganizationField::TradeName), trade_name));
                }
                fields
            }
        }
    }
}
