//! # ANSI Colors
//!
//! Fixed escape sequences used by the printer and the traceback formatter.
//!
//! The palette is the bold 8-color set. There is no "reset to default"
//! sequence: lines are closed with [`Ansi::RESET`], which is bold white, so
//! the output matches what an IPython shell shows on a dark terminal.

use std::fmt;
use std::str::FromStr;

/// A terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ansi
{
    /// No escape sequence at all.
    None,
    /// Bold red, used for error summaries.
    Red,
    /// Bold green, used for file names and line numbers.
    Green,
    /// Bold yellow.
    Yellow,
    /// Bold blue.
    Blue,
    /// Bold purple, aka magenta. Used for function names.
    Purple,
    /// Bold cyan, used for frame labels.
    Cyan,
    /// Bold white, the neutral color.
    White,
}

impl Ansi
{
    /// Same escape sequence as [`Ansi::Purple`].
    pub const MAGENTA: Ansi = Ansi::Purple;

    /// Color every colored line is terminated with.
    pub const RESET: Ansi = Ansi::White;

    /// Every distinct color, in declaration order.
    pub const ALL: [Ansi; 8] = [
        Ansi::None,
        Ansi::Red,
        Ansi::Green,
        Ansi::Yellow,
        Ansi::Blue,
        Ansi::Purple,
        Ansi::Cyan,
        Ansi::White,
    ];

    /// Raw escape sequence.
    pub const fn code(self) -> &'static str
    {
        match self {
            Ansi::None => "",
            Ansi::Red => "\x1b[1;31m",
            Ansi::Green => "\x1b[1;32m",
            Ansi::Yellow => "\x1b[1;33m",
            Ansi::Blue => "\x1b[1;34m",
            Ansi::Purple => "\x1b[1;35m",
            Ansi::Cyan => "\x1b[1;36m",
            Ansi::White => "\x1b[1;37m",
        }
    }

    /// Lowercase name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str
    {
        match self {
            Ansi::None => "none",
            Ansi::Red => "red",
            Ansi::Green => "green",
            Ansi::Yellow => "yellow",
            Ansi::Blue => "blue",
            Ansi::Purple => "purple",
            Ansi::Cyan => "cyan",
            Ansi::White => "white",
        }
    }
}

impl fmt::Display for Ansi
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.code())
    }
}

impl FromStr for Ansi
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(Ansi::None),
            "red" => Ok(Ansi::Red),
            "green" => Ok(Ansi::Green),
            "yellow" => Ok(Ansi::Yellow),
            "blue" => Ok(Ansi::Blue),
            "purple" | "magenta" => Ok(Ansi::Purple),
            "cyan" => Ok(Ansi::Cyan),
            "white" => Ok(Ansi::White),
            _ => Err(format!(
                "Unknown color: {s}. Use one of none, red, green, yellow, blue, purple, magenta, cyan, white"
            )),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_escape_codes()
    {
        assert_eq!(Ansi::None.code(), "");
        assert_eq!(Ansi::Red.code(), "\x1b[1;31m");
        assert_eq!(Ansi::White.code(), "\x1b[1;37m");
        assert_eq!(Ansi::MAGENTA, Ansi::Purple);
        assert_eq!(Ansi::RESET, Ansi::White);
    }

    #[test]
    fn test_display_is_code()
    {
        assert_eq!(format!("{}x{}", Ansi::Cyan, Ansi::RESET), "\x1b[1;36mx\x1b[1;37m");
    }

    #[test]
    fn test_from_str()
    {
        for color in Ansi::ALL {
            assert_eq!(Ansi::from_str(color.name()).unwrap(), color);
        }
        assert_eq!(Ansi::from_str("MAGENTA").unwrap(), Ansi::Purple);
        assert!(Ansi::from_str("chartreuse").is_err());
    }
}
