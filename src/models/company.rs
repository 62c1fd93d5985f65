use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    error::Result,
    validation::{Violations, non_empty},
};

/// Primary key of the only company profile row.
pub const COMPANY_PROFILE_ID: i64 = 1;

/// Database company profile model
#[derive(Debug, Clone, FromRow)]
pub struct CompanyProfile {
    pub id: i64,
    pub company_name: String,
    pub company_logo: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gst_number: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub branch_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// JSON representation of the profile, shared by requests and responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfileDto {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_logo: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub bank_account_number: Option<String>,
    #[serde(default)]
    pub ifsc_code: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
}

impl From<CompanyProfile> for CompanyProfileDto {
    fn from(profile: CompanyProfile) -> Self {
        Self {
            company_name: Some(profile.company_name),
            company_logo: profile.company_logo,
            address: profile.address,
            phone: profile.phone,
            email: profile.email,
            gst_number: profile.gst_number,
            bank_name: profile.bank_name,
            bank_account_number: profile.bank_account_number,
            ifsc_code: profile.ifsc_code,
            branch_name: profile.branch_name,
        }
    }
}

/// Validated profile fields ready to be upserted.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyProfileFields {
    pub company_name: String,
    pub company_logo: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gst_number: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub branch_name: Option<String>,
}

impl CompanyProfileDto {
    pub fn validate(self) -> Result<CompanyProfileFields> {
        let mut violations = Violations::new();
        let company_name =
            violations.required_text("companyName", self.company_name, "Company name is required");

        violations.finish(CompanyProfileFields {
            company_name,
            company_logo: non_empty(self.company_logo),
            address: non_empty(self.address),
            phone: non_empty(self.phone),
            email: non_empty(self.email),
            gst_number: non_empty(self.gst_number),
            bank_name: non_empty(self.bank_name),
            bank_account_number: non_empty(self.bank_account_number),
            ifsc_code: non_empty(self.ifsc_code),
            branch_name: non_empty(self.branch_name),
        })
    }
}
