//! DP3 (`DPHDP3`) and SH (`DPHSHV`) statement filling.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::patch::{ElementPatch, TemplatePatch};
use crate::core::{Filing, FilingError, MonthKey};

/// Filer metadata shared by both statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilerInfo {
    /// Submission date (`d_poddp`), `DD.MM.YYYY`.
    pub submit_date: String,
    /// Tax office code (`c_ufo`).
    pub c_ufo: Option<String>,
    /// Tax office branch code (`c_pracufo`).
    pub c_pracufo: Option<String>,
}

fn veta_d(filing: &Filing, filer: &FilerInfo) -> ElementPatch {
    ElementPatch::optional("VetaD")
        .set("rok", filing.month.year().to_string())
        .set("mesic", filing.month.month().to_string())
        .set("d_poddp", filer.submit_date.as_str())
}

fn veta_p(filer: &FilerInfo) -> ElementPatch {
    ElementPatch::optional("VetaP")
        .set_opt("c_ufo", filer.c_ufo.as_deref())
        .set_opt("c_pracufo", filer.c_pracufo.as_deref())
}

/// Fill the DP3 template: period, filer, and the services total (`pln_sluzby`).
pub fn fill_dp3(template: &str, filing: &Filing, filer: &FilerInfo) -> Result<String, FilingError> {
    TemplatePatch::new("DPHDP3")
        .element(veta_d(filing, filer))
        .element(veta_p(filer))
        .element(ElementPatch::optional("Veta2").set("pln_sluzby", format!("{}.0", filing.total)))
        .apply(template)
}

/// Fill the SH template: period, filer, and the single `VetaR` line.
pub fn fill_sh(template: &str, filing: &Filing, filer: &FilerInfo) -> Result<String, FilingError> {
    TemplatePatch::new("DPHSHV")
        .element(veta_d(filing, filer))
        .element(veta_p(filer))
        .element(
            ElementPatch::required("VetaR")
                .set("pln_hodnota", filing.total.to_string())
                .set("pln_pocet", filing.count.to_string())
                .set("k_stat", filing.jurisdiction.country.as_str())
                .set("c_vat", filing.jurisdiction.vat.as_str()),
        )
        .apply(template)
}

/// `{prefix}-DP3-YYYY-MM.xml` and `{prefix}-SH-YYYY-MM.xml`.
pub fn output_file_names(prefix: &str, month: MonthKey) -> (String, String) {
    (
        format!("{prefix}-DP3-{month}.xml"),
        format!("{prefix}-SH-{month}.xml"),
    )
}

/// Where templates come from and where filled statements go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    pub dp3_template: PathBuf,
    pub sh_template: PathBuf,
    /// Created when missing.
    pub out_dir: PathBuf,
    /// Leading part of the output file names.
    pub name_prefix: String,
}

/// Load a template file.
pub fn load_template(path: &Path) -> Result<String, FilingError> {
    if !path.exists() {
        return Err(FilingError::Template(format!(
            "Template not found: {}",
            path.display()
        )));
    }
    fs::read_to_string(path)
        .map_err(|e| FilingError::Io(format!("cannot read {}: {e}", path.display())))
}

/// Fill and write both statements for every filing; returns written paths.
///
/// All documents are rendered before the first file is written, so a
/// template problem leaves the output directory untouched.
pub fn write_statements(
    plan: &OutputPlan,
    filer: &FilerInfo,
    filings: &[&Filing],
) -> Result<Vec<PathBuf>, FilingError> {
    if filings.is_empty() {
        return Ok(Vec::new());
    }
    let dp3_template = load_template(&plan.dp3_template)?;
    let sh_template = load_template(&plan.sh_template)?;

    let mut rendered = Vec::with_capacity(filings.len() * 2);
    for filing in filings {
        let (dp3_name, sh_name) = output_file_names(&plan.name_prefix, filing.month);
        rendered.push((plan.out_dir.join(dp3_name), fill_dp3(&dp3_template, filing, filer)?));
        rendered.push((plan.out_dir.join(sh_name), fill_sh(&sh_template, filing, filer)?));
    }

    fs::create_dir_all(&plan.out_dir).map_err(|e| {
        FilingError::Io(format!("cannot create {}: {e}", plan.out_dir.display()))
    })?;

    let mut written = Vec::with_capacity(rendered.len());
    for (path, xml) in rendered {
        fs::write(&path, xml)
            .map_err(|e| FilingError::Io(format!("cannot write {}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), "statement written");
        written.push(path);
    }
    Ok(written)
}
