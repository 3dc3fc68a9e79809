//! Environment configuration.
//!
//! Values come from the process environment (a `.env` file is loaded by the
//! binary first). Parsing goes through a lookup function so tests can feed a
//! plain map.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::core::FilingError;
use crate::fakturoid::Credentials;
use crate::template::{FilerInfo, OutputPlan};

pub const DEFAULT_TEMPLATE_DP3: &str = "templates/dphdp3.xml";
pub const DEFAULT_TEMPLATE_SH: &str = "templates/dphshv.xml";
pub const DEFAULT_OUT_DIR: &str = "xml_vygenerovane";

/// Fakturoid access settings.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub credentials: Credentials,
    /// `FAKTUROID_ACCOUNT_SLUG`; discovered from `/user.json` when unset.
    pub account_slug: Option<String>,
}

impl ApiSettings {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, FilingError> {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let missing: Vec<&str> = ["FAKTUROID_CLIENT_ID", "FAKTUROID_CLIENT_SECRET", "FAKTUROID_UA"]
            .into_iter()
            .filter(|name| var(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(FilingError::Configuration(format!(
                "Set env: {}",
                missing.join(", ")
            )));
        }
        Ok(Self {
            credentials: Credentials {
                client_id: var("FAKTUROID_CLIENT_ID").unwrap_or_default(),
                client_secret: var("FAKTUROID_CLIENT_SECRET").unwrap_or_default(),
                user_agent: var("FAKTUROID_UA").unwrap_or_default(),
            },
            account_slug: var("FAKTUROID_ACCOUNT_SLUG"),
        })
    }

    pub fn from_env() -> Result<Self, FilingError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }
}

/// Settings for writing the XML statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlSettings {
    pub output: OutputPlan,
    pub filer: FilerInfo,
}

impl XmlSettings {
    /// `today` supplies the default submission date.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        today: NaiveDate,
    ) -> Result<Self, FilingError> {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let name_prefix = var("XML_NAME_PREFIX").ok_or_else(|| {
            FilingError::Configuration("Missing env var: XML_NAME_PREFIX".into())
        })?;
        let path = |name: &str, default: &str| PathBuf::from(var(name).unwrap_or_else(|| default.into()));

        Ok(Self {
            output: OutputPlan {
                dp3_template: path("XML_TEMPLATE_DP3", DEFAULT_TEMPLATE_DP3),
                sh_template: path("XML_TEMPLATE_SH", DEFAULT_TEMPLATE_SH),
                out_dir: path("XML_OUT_DIR", DEFAULT_OUT_DIR),
                name_prefix,
            },
            filer: FilerInfo {
                submit_date: var("DPH_SUBMIT_DATE")
                    .unwrap_or_else(|| today.format("%d.%m.%Y").to_string()),
                c_ufo: var("C_UFO"),
                c_pracufo: var("C_PRACUFO"),
            },
        })
    }

    pub fn from_env(today: NaiveDate) -> Result<Self, FilingError> {
        Self::from_lookup(|k| std::env::var(k).ok(), today)
    }
}
