/*!
 * Lookup of installed font families through fontconfig.
 *
 * The transcoder only writes a family name into the style record; this catalog
 * serves the surrounding tool (listing choices, locating a family's file).
 */

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::RenderError;

/// Source of installed font families
pub trait FontCatalog {
    /// Sorted, de-duplicated family names
    fn families(&self) -> Result<Vec<String>, RenderError>;

    /// File of the first font whose name matches `family`
    fn resolve(&self, family: &str) -> Result<Option<PathBuf>, RenderError>;
}

/// Catalog backed by the `fc-list` tool
pub struct FcListCatalog {
    program: String,
}

impl Default for FcListCatalog {
    fn default() -> Self {
        Self { program: "fc-list".to_string() }
    }
}

impl FcListCatalog {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    fn run(&self, format: &str) -> Result<String, RenderError> {
        let output = Command::new(&self.program)
            .arg("--format")
            .arg(format)
            .output()
            .map_err(|e| RenderError::ToolNotFound {
                tool: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                tool: self.program.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl FontCatalog for FcListCatalog {
    fn families(&self) -> Result<Vec<String>, RenderError> {
        Ok(parse_family_list(&self.run("%{fullname}\n")?))
    }

    fn resolve(&self, family: &str) -> Result<Option<PathBuf>, RenderError> {
        Ok(parse_font_lookup(&self.run("%{fullname},%{file}\n")?, family))
    }
}

/// First full name of every line, trimmed, sorted and de-duplicated
pub fn parse_family_list(output: &str) -> Vec<String> {
    let mut families: Vec<String> = output
        .lines()
        .filter_map(|line| line.split(',').next())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    families.sort();
    families.dedup();
    families
}

/// Path of the first `names,file` line where one of the names equals `family`
/// (ignoring case). Full names may contain commas, so the path is whatever
/// follows the last comma.
pub fn parse_font_lookup(output: &str, family: &str) -> Option<PathBuf> {
    let wanted = family.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    output.lines().find_map(|line| {
        let (names, file) = line.rsplit_once(',')?;
        let matches = names.split(',').any(|name| name.trim().to_lowercase() == wanted);
        let file = file.trim();
        (matches && !file.is_empty()).then(|| PathBuf::from(file))
    })
}

/// MIME type served for a font file
pub fn font_mime_type(path: &Path) -> &'static str {
    match path.extension().map(|ext| ext.to_string_lossy().to_lowercase()).as_deref() {
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        _ => "application/octet-stream",
    }
}
