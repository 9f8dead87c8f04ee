//! Parsing of CIL method body headers.
//!
//! A method body as stored in an assembly starts with a tiny (1 byte) or fat (12 byte)
//! header, followed by the instruction stream and, for fat headers, optional extra data
//! sections. The signature matcher only works on the instruction stream, this module finds
//! it.
//!
//! # Examples
//!
//! ```rust
//! use opscope::metadata::method::MethodBody;
//!
//! // Tiny header announcing 2 bytes of code: ldarg.0, ret
//! let data = [0x0A, 0x02, 0x2A];
//! let body = MethodBody::from(&data)?;
//!
//! assert!(!body.is_fat);
//! assert_eq!(body.code(&data), &[0x02, 0x2A]);
//! # Ok::<(), opscope::Error>(())
//! ```
//!
//! # References
//! - ECMA-335 6th Edition, Partition II, Section 25.4 - Method Header Format

use crate::{
    file::io::read_le,
    metadata::method::{
        MethodBodyFlags, METHOD_HEADER_FAT, METHOD_HEADER_FORMAT_MASK, METHOD_HEADER_TINY,
    },
    Error::OutOfBounds,
    Result,
};

/// Minimum size of a fat method header in bytes
const FAT_HEADER_SIZE: usize = 12;

/// The header of one method that has been compiled to CIL bytecode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodBody {
    /// Size of the method (length of all instructions, not counting the header) in bytes
    pub size_code: usize,
    /// Size of the method header in bytes
    pub size_header: usize,
    /// `MetaData` token for a signature describing the layout of the local variables for the
    /// method. 0 == no local variables
    pub local_var_sig_token: u32,
    /// Maximum number of items on the operand stack
    pub max_stack: usize,
    /// Flag, indicating the type of the method header
    pub is_fat: bool,
    /// Flag, indicating to call default constructor on all local variables
    pub is_init_local: bool,
    /// Flag, indicating that extra data sections (exception handlers) follow the code
    pub has_more_sections: bool,
}

impl MethodBody {
    /// Create a `MethodBody` object from a sequence of bytes starting at the method header.
    ///
    /// # Arguments
    /// * `data` - The byte slice from which this object shall be created
    ///
    /// # Errors
    /// Returns an error if the data is empty, shorter than the header announces, or the
    /// header format is neither tiny nor fat.
    pub fn from(data: &[u8]) -> Result<MethodBody> {
        if data.is_empty() {
            return Err(malformed_error!("Provided data for body parsing is empty"));
        }

        let first_byte = read_le::<u8>(data)?;
        match first_byte & METHOD_HEADER_FORMAT_MASK {
            METHOD_HEADER_TINY => {
                let size_code = (first_byte >> 2) as usize;
                if size_code + 1 > data.len() {
                    return Err(OutOfBounds);
                }

                Ok(MethodBody {
                    size_code,
                    size_header: 1,
                    local_var_sig_token: 0,
                    max_stack: 8,
                    is_fat: false,
                    is_init_local: false,
                    has_more_sections: false,
                })
            }
            METHOD_HEADER_FAT => {
                if data.len() < FAT_HEADER_SIZE {
                    return Err(OutOfBounds);
                }

                let first_duo = read_le::<u16>(data)?;

                let size_header = usize::from(first_duo >> 12) * 4;
                if size_header < FAT_HEADER_SIZE {
                    return Err(malformed_error!(
                        "Fat MethodHeader declares a size of {} bytes",
                        size_header
                    ));
                }

                let size_code = read_le::<u32>(&data[4..])? as usize;
                match size_header.checked_add(size_code) {
                    Some(size) if size <= data.len() => {}
                    _ => return Err(OutOfBounds),
                }

                let flags_header =
                    MethodBodyFlags::from_bits_truncate(first_duo & 0b_0000_1111_1111_1111_u16);

                Ok(MethodBody {
                    size_code,
                    size_header,
                    local_var_sig_token: read_le::<u32>(&data[8..])?,
                    max_stack: read_le::<u16>(&data[2..])? as usize,
                    is_fat: true,
                    is_init_local: flags_header.contains(MethodBodyFlags::INIT_LOCALS),
                    has_more_sections: flags_header.contains(MethodBodyFlags::MORE_SECTS),
                })
            }
            _ => Err(malformed_error!(
                "MethodHeader is neither FAT nor TINY - {}",
                first_byte
            )),
        }
    }

    /// Get the full size of this method
    #[must_use]
    pub fn size(&self) -> usize {
        self.size_code + self.size_header
    }

    /// Returns the instruction stream of this method.
    ///
    /// `data` must be the same slice the header was parsed from. Should it be shorter than
    /// the header announced, the available part of the code is returned.
    #[must_use]
    pub fn code<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        let start = self.size_header.min(data.len());
        let end = self.size().min(data.len());
        &data[start..end]
    }
}
