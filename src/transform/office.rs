//! LibreOffice bridge for PDF ↔ DOCX conversion.
//!
//! Conversion shells out to a headless `soffice`. Availability is probed
//! once at service construction ([`LibreOffice::discover`]); when nothing is
//! found, both conversion directions fail with `ConversionUnsupported`
//! instead of a mid-pipeline surprise.

use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Environment variable overriding soffice discovery.
pub const SOFFICE_ENV: &str = "PDFCHAIN_SOFFICE";

/// A located LibreOffice installation.
#[derive(Debug, Clone)]
pub struct LibreOffice {
    binary: PathBuf,
}

impl LibreOffice {
    /// Probe for a usable soffice binary.
    pub fn discover() -> Option<Self> {
        find_soffice().map(|binary| {
            log::debug!("using office converter at {}", binary.display());
            Self { binary }
        })
    }

    /// Use a specific soffice binary without probing.
    pub fn from_binary<P: Into<PathBuf>>(binary: P) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Convert `input` to `target_ext` ("pdf" or "docx"), writing into
    /// `outdir`. Returns the path of the produced file.
    pub fn convert(&self, input: &Path, target_ext: &str, outdir: &Path) -> Result<PathBuf> {
        let status = Command::new(&self.binary)
            .arg("--headless")
            .arg("--convert-to")
            .arg(target_ext)
            .arg("--outdir")
            .arg(outdir)
            .arg(input)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                Error::ConversionUnsupported(format!(
                    "failed to run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if !status.success() {
            return Err(Error::ConversionUnsupported(format!(
                "soffice exited with {}",
                status
            )));
        }

        // soffice names the output after the input stem, silently skipping
        // files it cannot read; treat a missing product as failure.
        let stem = input
            .file_stem()
            .ok_or_else(|| Error::UnreadableDocument("input has no file name".into()))?;
        let produced = outdir.join(stem).with_extension(target_ext);
        if !produced.exists() {
            return Err(Error::ConversionUnsupported(format!(
                "soffice produced no output for {}",
                input.display()
            )));
        }
        Ok(produced)
    }
}

/// Locate a soffice binary: env override first, then PATH, then
/// platform-conventional install locations.
pub fn find_soffice() -> Option<PathBuf> {
    if let Some(overridden) = env::var_os(SOFFICE_ENV) {
        let path = PathBuf::from(overridden);
        if path.is_file() {
            return Some(path);
        }
        log::warn!("{} is set but does not point to a file", SOFFICE_ENV);
    }

    let names: &[&str] = if cfg!(windows) {
        &["soffice.exe"]
    } else {
        &["soffice", "libreoffice"]
    };

    if let Some(path_var) = env::var_os("PATH") {
        for dir in env::split_paths(&path_var) {
            for name in names {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
    }

    let conventional: &[&str] = if cfg!(target_os = "macos") {
        &["/Applications/LibreOffice.app/Contents/MacOS/soffice"]
    } else if cfg!(windows) {
        &[
            "C:\\Program Files\\LibreOffice\\program\\soffice.exe",
            "C:\\Program Files (x86)\\LibreOffice\\program\\soffice.exe",
        ]
    } else {
        &["/usr/bin/soffice", "/usr/local/bin/soffice"]
    };
    conventional.iter().map(PathBuf::from).find(|p| p.is_file())
}
