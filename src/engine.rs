//! # Engine Locator
//!
//! Discovery and environment probes for the Tesseract binary: resolve the
//! executable, parse its version, and enumerate installed language packs.
//!
//! All probes are idempotent and side-effect-free beyond spawning the engine
//! process. The probe functions take a resolved binary path, so a binary must
//! be located before version or language checks can be expressed at all.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

use crate::errors::{AppResult, OcrError};
use crate::process::{self, ProcessError};

/// Name of the engine executable searched on PATH
pub const BINARY_NAME: &str = "tesseract";

/// Install locations checked before falling back to PATH
pub const INSTALL_LOCATIONS: &[&str] = &[
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
];

/// Environment variable overriding binary discovery
pub const BINARY_ENV_VAR: &str = "TESSERACT_CMD";

// Probes are cheap engine invocations; they still get a hard bound so a
// wedged binary cannot stall session startup.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

lazy_static! {
    static ref VERSION_RE: Regex =
        Regex::new(r"tesseract\s+v?(\d+)\.(\d+)(?:\.(\d+))?").expect("version regex is valid");
}

/// Parsed semantic version of the engine binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl std::fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Resolve the engine binary path.
///
/// Search order: explicit override (the `TESSERACT_CMD` convention), known
/// install locations, then every directory on `PATH`.
pub fn locate_binary(override_path: Option<&Path>) -> AppResult<PathBuf> {
    if let Some(path) = override_path {
        if path.is_file() {
            debug!(binary = %path.display(), "using engine binary override");
            return Ok(path.to_path_buf());
        }
        return Err(OcrError::EngineNotFound(format!(
            "configured engine binary does not exist: {}",
            path.display()
        )));
    }

    for location in INSTALL_LOCATIONS {
        let candidate = Path::new(location);
        if candidate.is_file() {
            debug!(binary = %candidate.display(), "found engine binary at install location");
            return Ok(candidate.to_path_buf());
        }
    }

    if let Some(path_var) = env::var_os("PATH") {
        for dir in env::split_paths(&path_var) {
            let candidate = dir.join(BINARY_NAME);
            if candidate.is_file() {
                debug!(binary = %candidate.display(), "found engine binary on PATH");
                return Ok(candidate);
            }
        }
    }

    Err(OcrError::EngineNotFound(format!(
        "{} binary not found in install locations or PATH; install tesseract-ocr or set {}",
        BINARY_NAME, BINARY_ENV_VAR
    )))
}

/// Probe the engine for its version (`tesseract --version`).
pub async fn engine_version(binary: &Path) -> AppResult<EngineVersion> {
    let output = process::invoke_with_timeout(binary, ["--version"], PROBE_TIMEOUT)
        .await
        .map_err(|e| OcrError::VersionCheckFailed(e.to_string()))?;

    // Tesseract 3.x printed version info to stderr, 4+ prints to stdout.
    let combined = format!("{}\n{}", output.stdout_text(), output.stderr);
    parse_version(&combined).ok_or_else(|| {
        OcrError::VersionCheckFailed(format!(
            "could not parse version from engine output: {:?}",
            combined.lines().next().unwrap_or_default()
        ))
    })
}

/// Probe the engine for installed language packs (`tesseract --list-langs`).
///
/// Returns one language code per output line, excluding the header line and
/// any footer noise.
pub async fn installed_languages(binary: &Path) -> AppResult<Vec<String>> {
    let output = process::invoke_with_timeout(binary, ["--list-langs"], PROBE_TIMEOUT)
        .await
        .map_err(|e| match e {
            ProcessError::NotFound(path) => OcrError::EngineNotFound(path),
            other => OcrError::LanguageListFailed(other.to_string()),
        })?;

    // Older engines emit the list on stderr.
    let combined = format!("{}\n{}", output.stdout_text(), output.stderr);
    let languages = parse_language_list(&combined);
    if languages.is_empty() {
        return Err(OcrError::LanguageListFailed(
            "engine reported no installed languages".to_string(),
        ));
    }
    Ok(languages)
}

fn parse_version(output: &str) -> Option<EngineVersion> {
    let captures = VERSION_RE.captures(output)?;
    let major = captures.get(1)?.as_str().parse().ok()?;
    let minor = captures.get(2)?.as_str().parse().ok()?;
    let patch = captures
        .get(3)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    Some(EngineVersion {
        major,
        minor,
        patch,
    })
}

fn parse_language_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| {
            // Header ("List of available languages (123):") and any other
            // prose lines are excluded; codes are single bare tokens.
            !line.is_empty() && !line.contains(':') && !line.contains(' ')
        })
        .map(str::to_string)
        .collect()
}

/// Validated OCR engine environment: resolved binary, version, and the set of
/// installed language packs. Constructed once at session start; any probe
/// failure here is fatal and must halt before uploads are accepted.
#[derive(Debug, Clone)]
pub struct Engine {
    pub binary: PathBuf,
    pub version: EngineVersion,
    pub installed_languages: Vec<String>,
}

impl Engine {
    /// Locate and verify the engine: binary path, version, language packs.
    pub async fn initialize(override_path: Option<&Path>) -> AppResult<Self> {
        let binary = locate_binary(override_path)?;
        let version = engine_version(&binary).await?;
        let installed_languages = installed_languages(&binary).await?;

        info!(
            binary = %binary.display(),
            version = %version,
            languages = installed_languages.len(),
            "OCR engine initialized"
        );

        Ok(Self {
            binary,
            version,
            installed_languages,
        })
    }

    /// Whether a language pack is installed for the given catalog code.
    pub fn is_language_installed(&self, code: &str) -> bool {
        self.installed_languages.iter().any(|lang| lang == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_modern_output() {
        let output = "tesseract 5.3.4\n leptonica-1.84.1\n  libgif 5.2.1";
        assert_eq!(
            parse_version(output),
            Some(EngineVersion {
                major: 5,
                minor: 3,
                patch: 4
            })
        );
    }

    #[test]
    fn test_parse_version_legacy_v_prefix() {
        let output = "tesseract v4.1.1\n leptonica-1.78.0";
        assert_eq!(
            parse_version(output),
            Some(EngineVersion {
                major: 4,
                minor: 1,
                patch: 1
            })
        );
    }

    #[test]
    fn test_parse_version_missing_patch_defaults_to_zero() {
        assert_eq!(
            parse_version("tesseract 4.0"),
            Some(EngineVersion {
                major: 4,
                minor: 0,
                patch: 0
            })
        );
    }

    #[test]
    fn test_parse_version_rejects_garbage() {
        assert_eq!(parse_version("command not found"), None);
        assert_eq!(parse_version(""), None);
    }

    #[test]
    fn test_parse_language_list_skips_header() {
        let output = "List of available languages (3):\neng\nfra\nosd\n";
        assert_eq!(parse_language_list(output), vec!["eng", "fra", "osd"]);
    }

    #[test]
    fn test_parse_language_list_trims_and_skips_blanks() {
        let output = "List of available languages (2):\n\n  eng  \n\ndeu\n";
        assert_eq!(parse_language_list(output), vec!["eng", "deu"]);
    }

    #[test]
    fn test_locate_binary_rejects_missing_override() {
        let err = locate_binary(Some(Path::new("/nonexistent/tesseract")))
            .expect_err("missing override must fail");
        assert!(matches!(err, OcrError::EngineNotFound(_)));
    }

    #[test]
    fn test_engine_language_lookup() {
        let engine = Engine {
            binary: PathBuf::from("/usr/bin/tesseract"),
            version: EngineVersion {
                major: 5,
                minor: 0,
                patch: 0,
            },
            installed_languages: vec!["eng".to_string(), "fra".to_string()],
        };
        assert!(engine.is_language_installed("eng"));
        assert!(!engine.is_language_installed("jpn"));
    }
}
