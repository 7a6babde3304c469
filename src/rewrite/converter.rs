//! Text conversion profiles.

use std::fmt;
use std::str::FromStr;

use zhconv::{zhconv, Variant};

/// A text transform applied to selected JSON string fields.
pub trait TextConverter: Send + Sync + fmt::Debug {
    fn convert(&self, text: &str) -> String;
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl TextConverter for Identity {
    fn convert(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Chinese script/variant conversion backed by `zhconv`.
#[derive(Debug, Clone, Copy)]
pub struct ScriptConverter {
    target: Variant,
}

impl ScriptConverter {
    pub fn new(target: Variant) -> Self {
        Self { target }
    }
}

impl TextConverter for ScriptConverter {
    fn convert(&self, text: &str) -> String {
        zhconv(text, self.target)
    }
}

/// Conversion profile, named after the OpenCC configuration files.
///
/// Profiles resolve onto the `zhconv` target variants, which always apply
/// regional phrase tables. `s2tw`, `s2twp` and `t2tw` therefore behave
/// identically (Taiwan phrasing included), as do `t2s`, `tw2s` and `hk2s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionProfile {
    Identity,
    /// Simplified to Traditional.
    S2t,
    /// Traditional to Simplified.
    T2s,
    /// Simplified to Taiwan standard. Same output as `S2twp`.
    S2tw,
    /// Simplified to Taiwan standard with Taiwanese phrases.
    S2twp,
    /// Taiwan standard to Simplified.
    Tw2s,
    /// Taiwan standard to Simplified with mainland phrases.
    Tw2sp,
    /// Simplified to Hong Kong variant.
    S2hk,
    /// Hong Kong variant to Simplified.
    Hk2s,
    /// Traditional to Taiwan standard.
    T2tw,
    /// Traditional to Hong Kong variant.
    T2hk,
}

/// Error returned for an unrecognized profile name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown conversion profile '{0}'")]
pub struct UnknownProfile(pub String);

impl FromStr for ConversionProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_suffix(".json").unwrap_or(name);
        let profile = match name.to_ascii_lowercase().as_str() {
            "identity" | "none" => Self::Identity,
            "s2t" => Self::S2t,
            "t2s" => Self::T2s,
            "s2tw" => Self::S2tw,
            "s2twp" => Self::S2twp,
            "tw2s" => Self::Tw2s,
            "tw2sp" => Self::Tw2sp,
            "s2hk" => Self::S2hk,
            "hk2s" => Self::Hk2s,
            "t2tw" => Self::T2tw,
            "t2hk" => Self::T2hk,
            _ => return Err(UnknownProfile(s.to_string())),
        };
        Ok(profile)
    }
}

impl ConversionProfile {
    /// The `zhconv` variant this profile converts into, if any.
    fn target(self) -> Option<Variant> {
        match self {
            Self::Identity => None,
            Self::S2t => Some(Variant::ZhHant),
            Self::T2s | Self::Tw2s | Self::Hk2s => Some(Variant::ZhHans),
            Self::Tw2sp => Some(Variant::ZhCN),
            Self::S2tw | Self::S2twp | Self::T2tw => Some(Variant::ZhTW),
            Self::S2hk | Self::T2hk => Some(Variant::ZhHK),
        }
    }

    /// Build the converter for this profile.
    pub fn converter(self) -> Box<dyn TextConverter> {
        match self.target() {
            Some(target) => Box::new(ScriptConverter::new(target)),
            None => Box::new(Identity),
        }
    }
}
