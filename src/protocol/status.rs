//! Status code translation
//!
//! The debug monitor prefixes every response with a three digit decimal code.
//! The leading digit is `2` on success and `4` on failure; the remaining two
//! digits are a sub-code local to the XBDM facility. Internally the code is
//! widened to an HRESULT-style [`ResultCode`]:
//!
//! ```text
//! ┌──────────┬─────────────────────┬──────────────────────┐
//! │ Fail (1) │  Facility 0x2DA (15)│   Sub-code (16)      │
//! └──────────┴─────────────────────┴──────────────────────┘
//! ```

use std::fmt;

/// Facility tag carried by every XBDM result code
pub const FACILITY_XBDM: u32 = 0x2DA;

/// Highest sub-code expressible in two decimal digits
pub const MAX_WIRE_SUBCODE: u32 = 99;

const FAILURE_BIT: u32 = 1 << 31;

/// How the sub-code digits of a wire status are read back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubCodeDecoding {
    /// Tens and ones digits together (`410` → sub-code 10)
    #[default]
    TwoDigit,

    /// Final digit only, as older clients did (`410` → sub-code 0).
    /// Any sub-code of 10 or more decodes to the wrong value.
    LastDigit,
}

// =============================================================================
// Wire Status Code
// =============================================================================

/// The raw three digit code from a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u32);

impl StatusCode {
    /// Widen to a facility-tagged result code
    pub fn decode(self, mode: SubCodeDecoding) -> ResultCode {
        decode(self.0, mode)
    }

    /// Success per the leading digit
    pub fn is_success(self) -> bool {
        is_success(self.0)
    }

    /// Failure per the leading digit
    pub fn is_failure(self) -> bool {
        is_failure(self.0)
    }
}

impl Default for StatusCode {
    /// `400`, the undefined error
    fn default() -> Self {
        StatusCode(400)
    }
}

impl From<u32> for StatusCode {
    fn from(code: u32) -> Self {
        StatusCode(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Decode a wire status into its result code
pub fn decode(code: u32, mode: SubCodeDecoding) -> ResultCode {
    let digits = code.to_string();
    let failed = digits.starts_with('4');

    let sub_code = match mode {
        SubCodeDecoding::TwoDigit => {
            let tail = &digits[1.min(digits.len())..];
            let start = tail.len().saturating_sub(2);
            tail[start..].parse::<u32>().unwrap_or(0)
        }
        SubCodeDecoding::LastDigit => digits
            .chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .unwrap_or(0),
    };

    ResultCode::new(failed, sub_code)
}

/// Encode a result code back into a wire status.
///
/// Foreign facilities collapse to `200`/`400` depending on the failure bit;
/// sub-codes that need more than two digits collapse to `400`.
pub fn encode(result: ResultCode) -> u32 {
    let result = if result.facility() != FACILITY_XBDM {
        if result.is_failure() {
            ResultCode::UNDEFINED
        } else {
            ResultCode::NOERR
        }
    } else if result.sub_code() > MAX_WIRE_SUBCODE {
        ResultCode::UNDEFINED
    } else {
        result
    };

    let lead = if result.is_failure() { 4 } else { 2 };
    lead * 100 + result.sub_code()
}

/// True when the wire status carries the success digit
pub fn is_success(code: u32) -> bool {
    !is_failure(code)
}

/// True when the wire status carries the failure digit
pub fn is_failure(code: u32) -> bool {
    code.to_string().starts_with('4')
}

// =============================================================================
// Result Code
// =============================================================================

/// HRESULT-style result code in the XBDM facility
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultCode(pub u32);

macro_rules! result_codes {
    ($( $name:ident = ($fail:expr, $sub:expr), $desc:expr; )*) => {
        impl ResultCode {
            $( pub const $name: ResultCode = ResultCode::new($fail, $sub); )*

            /// Every code with a symbolic name
            pub const KNOWN: &'static [ResultCode] = &[$( ResultCode::$name ),*];

            /// Symbolic name, e.g. `XBDM_NOSUCHFILE`
            pub fn name(self) -> Option<&'static str> {
                match self {
                    $( ResultCode::$name => Some(concat!("XBDM_", stringify!($name))), )*
                    _ => None,
                }
            }

            /// Human-readable description for diagnostics
            pub fn description(self) -> &'static str {
                match self {
                    $( ResultCode::$name => $desc, )*
                    _ => "Unknown status code.",
                }
            }
        }
    };
}

result_codes! {
    NOERR = (false, 0), "No error occurred.";
    CONNECTED = (false, 1), "A connection has been successfully established.";
    MULTIRESPONSE = (false, 2), "A multi-line response follows.";
    BINRESPONSE = (false, 3), "A binary response follows.";
    READYFORBIN = (false, 4), "The server is ready to receive binary data.";
    DEDICATED = (false, 5), "A connection has been dedicated to a specific threaded command handler.";
    PROFILERESTARTED = (false, 6), "The profiling session has been restarted successfully.";
    FASTCAPENABLED = (false, 7), "Fast call-attribute profiling is enabled.";
    CALLCAPENABLED = (false, 8), "Calling call-attribute profiling is enabled.";
    RESULTCODE = (false, 9), "A result code.";
    UNDEFINED = (true, 0), "An undefined error has occurred.";
    MAXCONNECT = (true, 1), "The maximum number of connections has been exceeded.";
    NOSUCHFILE = (true, 2), "No such file exists.";
    NOMODULE = (true, 3), "No such module exists.";
    MEMUNMAPPED = (true, 4), "The referenced memory has been unmapped.";
    NOTHREAD = (true, 5), "No such thread ID exists.";
    CLOCKNOTSET = (true, 6), "The console clock is not set.";
    INVALIDCMD = (true, 7), "An invalid command was specified.";
    NOTSTOPPED = (true, 8), "Thread not stopped.";
    MUSTCOPY = (true, 9), "File must be copied, not moved.";
    ALREADYEXISTS = (true, 10), "A file already exists with the same name.";
    DIRNOTEMPTY = (true, 11), "The directory is not empty.";
    BADFILENAME = (true, 12), "An invalid file name was specified.";
    CANNOTCREATE = (true, 13), "Cannot create the specified file.";
    CANNOTACCESS = (true, 14), "Cannot access the specified file.";
    DEVICEFULL = (true, 15), "The device is full.";
    NOTDEBUGGABLE = (true, 16), "This title is not debuggable.";
    BADCOUNTTYPE = (true, 17), "The counter type is invalid.";
    COUNTUNAVAILABLE = (true, 18), "Counter data is not available.";
    NOTLOCKED = (true, 20), "The console is not locked.";
    KEYXCHG = (true, 21), "Key exchange is required.";
    MUSTBEDEDICATED = (true, 22), "A dedicated connection is required.";
    INVALIDARG = (true, 23), "The argument was invalid.";
    PROFILENOTSTARTED = (true, 24), "The profile is not started.";
    PROFILEALREADYSTARTED = (true, 25), "The profile is already started.";
    ALREADYSTOPPED = (true, 26), "The console is already stopped.";
    FASTCAPNOTENABLED = (true, 27), "FastCAP is not enabled.";
    NOMEMORY = (true, 28), "The debug monitor could not allocate memory.";
    TIMEOUT = (true, 29), "Profiling initialization has taken longer than allowed.";
    NOSUCHPATH = (true, 30), "The path was not found.";
    INVALID_SCREEN_INPUT_FORMAT = (true, 31), "The screen input format is invalid.";
    INVALID_SCREEN_OUTPUT_FORMAT = (true, 32), "The screen output format is invalid.";
    CALLCAPNOTENABLED = (true, 33), "CallCAP is not enabled.";
    INVALIDCAPCFG = (true, 34), "Both FastCAP and CallCAP are enabled in different modules.";
    CAPNOTENABLED = (true, 35), "Neither FastCAP nor CallCAP are enabled.";
    TOOBIGJUMP = (true, 36), "A branch to a section of instrumentation code failed.";
    FIELDNOTPRESENT = (true, 37), "A necessary field is not present in the title header.";
    OUTPUTBUFFERTOOSMALL = (true, 38), "Provided data buffer for profiling is too small.";
    PROFILEREBOOT = (true, 39), "The console is currently rebooting.";
    MAXDURATIONEXCEEDED = (true, 41), "The maximum duration was exceeded.";
    INVALIDSTATE = (true, 42), "The controller automation state is incompatible with the requested action.";
    MAXEXTENSIONS = (true, 43), "The maximum number of extensions are already used.";
    PMCSESSIONALREADYACTIVE = (true, 44), "The performance monitor counter session is already active.";
    PMCSESSIONNOTACTIVE = (true, 45), "The performance monitor counter session is not active.";
    LINE_TOO_LONG = (true, 46), "The command line exceeded 512 characters including CR/LF.";
    D3D_DEBUG_COMMAND_NOT_IMPLEMENTED = (true, 0x50), "The current application has an incompatible version of D3D.";
    D3D_INVALID_SURFACE = (true, 0x51), "The D3D surface is not currently valid.";
    CANNOTCONNECT = (true, 0x100), "Cannot connect to the target system.";
    CONNECTIONLOST = (true, 0x101), "The connection to the target system has been lost.";
    FILEERROR = (true, 0x103), "An unexpected file error has occurred.";
    ENDOFLIST = (true, 0x104), "End of list.";
    BUFFER_TOO_SMALL = (true, 0x105), "The buffer referenced was too small to receive the requested data.";
    NOTXBEFILE = (true, 0x106), "The file specified is not a valid executable.";
    MEMSETINCOMPLETE = (true, 0x107), "Not all requested memory could be written.";
    NOXBOXNAME = (true, 0x108), "No target system name has been set.";
    NOERRORSTRING = (true, 0x109), "There is no string representation of this error code.";
    INVALIDSTATUS = (true, 0x10A), "The console returned a malformed status string.";
    TASK_PENDING = (true, 0x150), "A previous command is still pending.";
}

impl ResultCode {
    /// Build a code in the XBDM facility
    pub const fn new(failed: bool, sub_code: u32) -> Self {
        let fail = if failed { FAILURE_BIT } else { 0 };
        ResultCode(fail | (FACILITY_XBDM << 16) | (sub_code & 0xFFFF))
    }

    pub fn is_failure(self) -> bool {
        self.0 & FAILURE_BIT != 0
    }

    pub fn is_success(self) -> bool {
        !self.is_failure()
    }

    pub fn facility(self) -> u32 {
        (self.0 >> 16) & 0x7FFF
    }

    pub fn sub_code(self) -> u32 {
        self.0 & 0xFFFF
    }

    /// Narrow back to a wire status
    pub fn encode(self) -> StatusCode {
        StatusCode(encode(self))
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HRESULT 0x{:08X} ({}): {}",
            self.0,
            self.name().unwrap_or("UNKNOWN"),
            self.description()
        )
    }
}

impl fmt::Debug for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "ResultCode(0x{:08X})", self.0),
        }
    }
}
