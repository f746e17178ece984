use thiserror::Error;

#[derive(Error, Debug)]
pub enum StickbugError {
    #[error("Malformed coordinate '{token}': {reason}")]
    MalformedCoordinate { token: String, reason: String },

    #[error("Unsupported path command '{command}'")]
    UnsupportedPathCommand { command: char },

    #[error("Cannot discern between wall and sticks: every stroke is {width} wide, make the wall line thicker than the others")]
    AmbiguousWallStick { width: f64 },

    #[error("Empty input: {context}")]
    EmptyInput { context: String },

    #[error("No stroke-width declared in style '{style}'")]
    MissingStrokeWidth { style: String },

    #[error("Malformed stroke width '{value}'")]
    MalformedStrokeWidth { value: String },

    #[error("Invalid drawing dimensions {width}x{height}, both must be positive")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("Cannot pair {left} segments with {right} segments")]
    UnbalancedCollections { left: usize, right: usize },

    #[error(
        "Interpolation needs between 1 and {} steps",
        crate::domain::services::sequencer::MAX_STEPS
    )]
    InvalidStepCount,

    #[error("SVG document error: {message}")]
    SvgError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Geometry,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StickbugError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedCoordinate { .. }
            | Self::UnsupportedPathCommand { .. }
            | Self::MissingStrokeWidth { .. }
            | Self::MalformedStrokeWidth { .. }
            | Self::SvgError { .. }
            | Self::EmptyInput { .. } => ErrorCategory::Input,
            Self::AmbiguousWallStick { .. }
            | Self::InvalidDimensions { .. }
            | Self::UnbalancedCollections { .. }
            | Self::InvalidStepCount => ErrorCategory::Geometry,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Geometry => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給使用者的修正建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MalformedCoordinate { .. } => {
                "Check the path 'd' attribute: coordinates must be numbers separated by spaces or commas"
            }
            Self::UnsupportedPathCommand { .. } => {
                "Only straight line paths are supported (M/L with h/v); convert curves to lines before exporting"
            }
            Self::AmbiguousWallStick { .. } => {
                "Draw the wall with a thicker stroke than every stick"
            }
            Self::EmptyInput { .. } => "Provide at least one line in every drawing",
            Self::MissingStrokeWidth { .. } => {
                "Add a stroke-width to the path style or set [extract].default_stroke_width"
            }
            Self::MalformedStrokeWidth { .. } => "Use a numeric stroke-width such as '2px'",
            Self::InvalidDimensions { .. } => {
                "Set positive width and height attributes on the root <svg> element"
            }
            Self::UnbalancedCollections { .. } => "Balance both stick collections before pairing them",
            Self::InvalidStepCount => "Use a step count between 1 and 1000000",
            Self::SvgError { .. } => "Make sure the input file is a valid SVG document",
            Self::IoError(_) => "Check that the file exists and the output directory is writable",
            Self::SerializationError(_) => {
                "Make sure the line file follows the wall_line/stick_lines JSON layout"
            }
            Self::CsvError(_) => "Check that the frame output location is writable",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file and try again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The drawing could not be read: {}", self),
            ErrorCategory::Geometry => format!("The lines could not be processed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StickbugError>;
