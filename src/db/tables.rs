/// Provides the schema of the "users" table.
pub struct UserTable;

impl UserTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "users";

    /// SQL statements creating the table and its lookup indexes.
    pub fn create_statements() -> Vec<String> {
        vec![
            format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id TEXT PRIMARY KEY NOT NULL,
                    username TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL,
                    email TEXT UNIQUE,
                    full_name TEXT,
                    is_active BOOLEAN NOT NULL DEFAULT 1,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                Self::TABLE_NAME
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_users_username ON {}(username)",
                Self::TABLE_NAME
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_users_email ON {}(email)",
                Self::TABLE_NAME
            ),
        ]
    }
}

/// Provides the schema of the "purchase_orders" table.
pub struct PurchaseOrderTable;

impl PurchaseOrderTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "purchase_orders";

    pub fn create_statements() -> Vec<String> {
        vec![
            format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id TEXT PRIMARY KEY NOT NULL,
                    date TEXT NOT NULL,
                    order_number TEXT NOT NULL UNIQUE,
                    party_name TEXT NOT NULL,
                    broker TEXT,
                    mill TEXT,
                    weight REAL,
                    bags INTEGER,
                    product TEXT,
                    rate REAL,
                    terms_and_conditions TEXT,
                    search_key TEXT NOT NULL DEFAULT '',
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                Self::TABLE_NAME
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_po_order_number ON {}(order_number)",
                Self::TABLE_NAME
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_po_date ON {}(date)",
                Self::TABLE_NAME
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_po_party_name ON {}(party_name)",
                Self::TABLE_NAME
            ),
        ]
    }
}

/// Provides the schema of the "company_profile" table. The check
/// constraint pins the table to a single row.
pub struct CompanyProfileTable;

impl CompanyProfileTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "company_profile";

    pub fn create_statements() -> Vec<String> {
        vec![format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY NOT NULL DEFAULT 1,
                company_name TEXT NOT NULL,
                company_logo TEXT,
                address TEXT,
                phone TEXT,
                email TEXT,
                gst_number TEXT,
                bank_name TEXT,
                bank_account_number TEXT,
                ifsc_code TEXT,
                branch_name TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                CONSTRAINT company_profile_single_row CHECK (id = 1)
            )",
            Self::TABLE_NAME
        )]
    }
}
