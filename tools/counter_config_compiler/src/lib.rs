use std::{fmt, fs, path::Path};

use serde::Deserialize;

pub const MAX_WINDOW_SIZE: u8 = 16;

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterFile {
    pub thresholds: ThresholdsSection,
    pub peak_detector: PeakDetectorSection,
    pub path: PathSection,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdsSection {
    pub floor: i32,
    pub floor_to_ceiling: i32,
    pub vacancy_percent: u8,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeakDetectorSection {
    pub window_size: u8,
    pub dispersion_tolerance: u16,
    pub policy: PolicyName,
    #[serde(default)]
    pub floor: Option<i32>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PolicyName {
    Strict,
    Lenient,
}

impl PolicyName {
    fn rust_path(self) -> &'static str {
        match self {
            Self::Strict => "PeakPolicy::Strict",
            Self::Lenient => "PeakPolicy::Lenient",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathSection {
    pub peak_variation_tolerance: u16,
}

#[derive(Debug)]
pub enum ConfigCompilerError {
    Io(String),
    Parse(String),
    Validation(String),
}

impl fmt::Display for ConfigCompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "io error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigCompilerError {}

pub fn parse_counter_file(path: &Path) -> Result<CounterFile, ConfigCompilerError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ConfigCompilerError::Io(format!("{}: {e}", path.display())))?;
    parse_counter_str(&raw)
}

pub fn parse_counter_str(raw: &str) -> Result<CounterFile, ConfigCompilerError> {
    toml::from_str(raw).map_err(|e| ConfigCompilerError::Parse(e.to_string()))
}

pub fn validate_config(config: &CounterFile) -> Result<(), ConfigCompilerError> {
    let thresholds = &config.thresholds;
    if thresholds.floor <= 0 {
        return Err(validation("thresholds.floor must be > 0"));
    }
    if thresholds.floor_to_ceiling <= 0 || thresholds.floor_to_ceiling > thresholds.floor {
        return Err(validation(
            "thresholds.floor_to_ceiling must be > 0 and <= thresholds.floor",
        ));
    }
    if !(1..=100).contains(&thresholds.vacancy_percent) {
        return Err(validation("thresholds.vacancy_percent must be within 1..=100"));
    }

    let detector = &config.peak_detector;
    if !(1..=MAX_WINDOW_SIZE).contains(&detector.window_size) {
        return Err(validation(&format!(
            "peak_detector.window_size must be within 1..={MAX_WINDOW_SIZE}"
        )));
    }
    if let Some(floor) = detector.floor {
        let ceiling = thresholds.floor - thresholds.floor_to_ceiling;
        if floor < ceiling || floor > thresholds.floor {
            return Err(validation(
                "peak_detector.floor must be within the ceiling..=floor range",
            ));
        }
    }

    Ok(())
}

fn validation(msg: &str) -> ConfigCompilerError {
    ConfigCompilerError::Validation(msg.to_string())
}

pub fn render_generated_config(config: &CounterFile) -> String {
    let thresholds = &config.thresholds;
    let detector = &config.peak_detector;
    let detector_floor = match detector.floor {
        Some(floor) => format!("Some({floor})"),
        None => "None".to_string(),
    };

    let mut out = String::new();
    out.push_str("// @generated by counter_config_compiler. Do not edit.\n");
    out.push_str("pub static COUNTER_CONFIG: PeopleCounterConfig = PeopleCounterConfig {\n");
    out.push_str("    thresholds: ThresholdConfig {\n");
    out.push_str(&format!("        floor: {},\n", thresholds.floor));
    out.push_str(&format!(
        "        floor_to_ceiling: {},\n",
        thresholds.floor_to_ceiling
    ));
    out.push_str(&format!(
        "        vacancy_percent: {},\n",
        thresholds.vacancy_percent
    ));
    out.push_str("    },\n");
    out.push_str("    peak_detector: PeakDetectorConfig {\n");
    out.push_str(&format!("        floor: {detector_floor},\n"));
    out.push_str(&format!("        window_size: {},\n", detector.window_size));
    out.push_str(&format!(
        "        dispersion_tolerance: {},\n",
        detector.dispersion_tolerance
    ));
    out.push_str(&format!("        policy: {},\n", detector.policy.rust_path()));
    out.push_str("    },\n");
    out.push_str(&format!(
        "    peak_variation_tolerance: {},\n",
        config.path.peak_variation_tolerance
    ));
    out.push_str("};\n");
    out
}

pub fn generate_from_path(path: &Path) -> Result<String, ConfigCompilerError> {
    let config = parse_counter_file(path)?;
    validate_config(&config)?;
    Ok(render_generated_config(&config))
}
