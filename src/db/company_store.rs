use chrono::Utc;

use crate::{
    db::DbPool,
    error::Result,
    models::company::{COMPANY_PROFILE_ID, CompanyProfile, CompanyProfileFields},
};

/// Store for the single company profile row
#[derive(Clone)]
pub struct CompanyStore {
    pool: DbPool,
}

impl CompanyStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self) -> Result<Option<CompanyProfile>> {
        let profile =
            sqlx::query_as::<_, CompanyProfile>("SELECT * FROM company_profile WHERE id = ?")
                .bind(COMPANY_PROFILE_ID)
                .fetch_optional(&self.pool)
                .await?;

        Ok(profile)
    }

    /// Insert the profile or overwrite every field of the existing row in a
    /// single statement. `created_at` survives updates.
    pub async fn save(&self, fields: &CompanyProfileFields) -> Result<CompanyProfile> {
        let now = Utc::now();

        let profile = sqlx::query_as::<_, CompanyProfile>(
            r#"
            INSERT INTO company_profile
            (id, company_name, company_logo, address, phone, email, gst_number,
             bank_name, bank_account_number, ifsc_code, branch_name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                company_name = excluded.company_name,
                company_logo = excluded.company_logo,
                address = excluded.address,
                phone = excluded.phone,
                email = excluded.email,
                gst_number = excluded.gst_number,
                bank_name = excluded.bank_name,
                bank_account_number = excluded.bank_account_number,
                ifsc_code = excluded.ifsc_code,
                branch_name = excluded.branch_name,
                updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(COMPANY_PROFILE_ID)
        .bind(&fields.company_name)
        .bind(&fields.company_logo)
        .bind(&fields.address)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.gst_number)
        .bind(&fields.bank_name)
        .bind(&fields.bank_account_number)
        .bind(&fields.ifsc_code)
        .bind(&fields.branch_name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM company_profile")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
