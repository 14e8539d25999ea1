use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const KB: f64 = 1_000.0;
pub const MB: f64 = 1_000_000.0;
pub const GB: f64 = 1_000_000_000.0;

/// Which unit thresholds to apply when scaling a byte count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeTiers {
    /// B below 1000, then KB, MB and GB at each power of 1000.
    #[default]
    Decimal,
    /// Tiers as rendered by older account list pages: no KB tier, values from
    /// 1000 up to 1e6 are shown in MB and everything above in GB.
    Legacy,
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SizeError {
    #[error("byte count must not be negative, got {0}")]
    Negative(f64),
    #[error("byte count must be a finite number")]
    NotFinite,
}

pub fn format_size(bytes: f64, tiers: SizeTiers) -> Result<String, SizeError> {
    if !bytes.is_finite() {
        return Err(SizeError::NotFinite);
    }
    if bytes < 0.0 {
        return Err(SizeError::Negative(bytes));
    }
    // -0.0 passes the check above and would otherwise print as "-0"
    let bytes = bytes.abs();
    if bytes < KB {
        return Ok(format!("{} B", bytes));
    }
    let text = match tiers {
        SizeTiers::Decimal => {
            if bytes < MB {
                format!("{} KB", fixed_2(bytes / KB))
            } else if bytes < GB {
                format!("{} MB", fixed_2(bytes / MB))
            } else {
                format!("{} GB", fixed_2(bytes / GB))
            }
        }
        SizeTiers::Legacy => {
            if bytes < MB {
                format!("{} MB", fixed_2(bytes / MB))
            } else {
                format!("{} GB", fixed_2(bytes / GB))
            }
        }
    };
    Ok(text)
}

/// Two decimals, with exact ties rounded up the way `Number.toFixed` does.
/// `{:.2}` alone sends ties to even, e.g. 1.125 to "1.12".
fn fixed_2(value: f64) -> String {
    // a double lies exactly halfway between two hundredths only when it is
    // an odd multiple of 1/8; scaling by 8 is exact
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        return format!("{:.2}", (value * 100.0).round() / 100.0);
    }
    format!("{:.2}", value)
}

/// Formats an integral byte count with the default tiers.
pub fn format_bytes(bytes: u64) -> String {
    // u64 counts are always finite and non-negative
    format_size(bytes as f64, SizeTiers::Decimal).unwrap_or_else(|e| e.to_string())
}
