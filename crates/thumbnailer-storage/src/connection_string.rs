//! Azure storage connection string parsing.
//!
//! Accepts the `Key=Value;Key=Value` format issued by the Azure portal, e.g.
//! `DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=...;EndpointSuffix=core.windows.net`,
//! and the `UseDevelopmentStorage=true` shorthand for the local emulator.

use crate::traits::{StorageError, StorageResult};

const EMULATOR_ACCOUNT: &str = "devstoreaccount1";

/// Credentials and endpoint extracted from a connection string
#[derive(Clone, PartialEq, Eq)]
pub struct AzureConnectionString {
    pub account_name: String,
    pub account_key: Option<String>,
    pub sas_token: Option<String>,
    pub blob_endpoint: Option<String>,
    pub use_emulator: bool,
}

impl std::fmt::Debug for AzureConnectionString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureConnectionString")
            .field("account_name", &self.account_name)
            .field("account_key", &self.account_key.as_ref().map(|_| "<redacted>"))
            .field("sas_token", &self.sas_token.as_ref().map(|_| "<redacted>"))
            .field("blob_endpoint", &self.blob_endpoint)
            .field("use_emulator", &self.use_emulator)
            .finish()
    }
}

impl AzureConnectionString {
    pub fn parse(raw: &str) -> StorageResult<Self> {
        let mut account_name = None;
        let mut account_key = None;
        let mut sas_token = None;
        let mut blob_endpoint = None;
        let mut use_emulator = false;

        for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            // Values (keys, SAS tokens) may themselves contain '='
            let (key, value) = part.split_once('=').ok_or_else(|| {
                StorageError::ConfigError(
                    "connection string segment is not a Key=Value pair".to_string(),
                )
            })?;
            let value = value.trim().to_string();

            match key.trim().to_ascii_lowercase().as_str() {
                "accountname" => account_name = Some(value),
                "accountkey" => account_key = Some(value),
                "sharedaccesssignature" => sas_token = Some(value),
                "blobendpoint" => blob_endpoint = Some(value),
                "usedevelopmentstorage" => use_emulator = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }

        if use_emulator && account_name.is_none() {
            account_name = Some(EMULATOR_ACCOUNT.to_string());
        }

        let account_name = account_name.ok_or_else(|| {
            StorageError::ConfigError("connection string has no AccountName".to_string())
        })?;

        if !use_emulator && account_key.is_none() && sas_token.is_none() {
            return Err(StorageError::ConfigError(
                "connection string needs an AccountKey or SharedAccessSignature".to_string(),
            ));
        }

        Ok(AzureConnectionString {
            account_name,
            account_key,
            sas_token,
            blob_endpoint,
            use_emulator,
        })
    }
}
