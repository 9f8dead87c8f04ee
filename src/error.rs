use thiserror::Error;

use crate::module::MemberKind;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Parsing Errors
/// - [`Error::Malformed`] - Corrupted method header or undefined opcode in strict decoding
/// - [`Error::OutOfBounds`] - Attempted to read beyond the end of a buffer
/// - [`Error::Empty`] - Empty input provided where data was required (e.g. an empty signature)
/// - [`Error::InvalidMnemonic`] - A signature referenced an opcode name that does not exist
///
/// ## Module Resolution Errors
/// - [`Error::ModuleNotFound`] - The expected module is not loaded in the host
/// - [`Error::ModuleAmbiguous`] - More than one loaded module carries the expected name
///
/// ## Registry Errors
/// - [`Error::SignatureNotFound`] - A named signature settled as "absent" but was required
/// - [`Error::DuplicateLabel`] - Two registry entries share one label
/// - [`Error::LabelNotFound`] - A label that was never registered was requested
///
/// # Examples
///
/// ```rust
/// use opscope::{Error, matcher::Signature};
///
/// match Signature::parse("ldarg.0 ldfld bogus") {
///     Ok(signature) => println!("{signature}"),
///     Err(Error::InvalidMnemonic(name)) => eprintln!("unknown opcode: {name}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The data is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// An opcode mnemonic could not be mapped to a CIL instruction.
    #[error("Unknown CIL mnemonic - '{0}'")]
    InvalidMnemonic(String),

    /// No loaded module matches the expected name.
    ///
    /// Nothing can be scanned without the target module, callers are expected to treat this
    /// as fatal.
    #[error("Unable to find a loaded module named '{name}'")]
    ModuleNotFound {
        /// The module name that was looked up
        name: String,
    },

    /// More than one loaded module carries the expected name.
    #[error("Found {count} loaded modules named '{name}', expected exactly one")]
    ModuleAmbiguous {
        /// The module name that was looked up
        name: String,
        /// How many modules matched
        count: usize,
    },

    /// A named signature did not match any member of the module.
    ///
    /// Returned when calling code requires the resolved member. Usually indicates that the
    /// target module changed structurally and the signature must be updated.
    #[error("Signature '{label}' did not match any {kind} in the module")]
    SignatureNotFound {
        /// The label of the unresolved signature
        label: String,
        /// What kind of member the signature was looking for
        kind: MemberKind,
    },

    /// A label was registered twice.
    #[error("Signature label '{0}' is already registered")]
    DuplicateLabel(String),

    /// A label was requested that the registry does not know.
    #[error("No signature registered under label '{0}'")]
    LabelNotFound(String),
}
