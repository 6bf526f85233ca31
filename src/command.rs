use display_interface::DisplayError;

use crate::interface::ShiftInterface;

/// CLR line, bit 0. Active low; held high while refreshing.
const CLR: u16 = 1 << 0;
/// Write-strobe lines occupy bits 3..=7, one per display module, active low.
const WR_FIRST: u8 = 3;
const WR_ALL_INACTIVE: u16 = 0x00F8;
/// 7-bit character data occupies bits 8..=14. Bit 15 is unused.
const DATA_SHIFT: u16 = 8;

/// Lowest and highest character codes the DL3416 can render.
pub(crate) const CHAR_MIN: u8 = 0x20;
pub(crate) const CHAR_MAX: u8 = 0x5F;

/// Map a byte onto the DL3416 character set. Codes outside the supported
/// range render as space. Applied once per refresh, never cached, so a
/// buffer update is picked up within one full scan.
pub(crate) fn to_display_code(byte: u8) -> u8 {
    if byte >= CHAR_MIN && byte <= CHAR_MAX {
        byte
    } else {
        0x20
    }
}

/// Address-line codes for the four digits of one module, already shifted
/// into bits 1..=2 of the control word.
///
/// The two wiring variants seen in the field disagree on which code selects
/// which digit, so the table is configuration data rather than logic. Pick
/// the constant matching the datasheet of the fitted part, or build a custom
/// table with [`DigitAddressing::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitAddressing {
    codes: [u16; 4],
}

impl DigitAddressing {
    /// Five cascaded modules behind two 74HC595s.
    /// Digit 1: A0=1 A1=1, digit 2: A0=0 A1=1, digit 3: A0=1 A1=0, digit 4: A0=0 A1=0.
    pub const CASCADE: DigitAddressing = DigitAddressing {
        codes: [0x06, 0x04, 0x02, 0x00],
    };

    /// A single module wired with its own address pins.
    /// Digit 1: A0=1 A1=0, digit 2: A0=0 A1=1, digit 3: A0=0 A1=0, digit 4: A0=1 A1=1.
    pub const STANDALONE: DigitAddressing = DigitAddressing {
        codes: [0x02, 0x04, 0x00, 0x06],
    };

    /// Build a table from raw A0/A1 codes, one per digit, pre-shifted into
    /// bits 1..=2.
    pub const fn new(codes: [u16; 4]) -> Self {
        DigitAddressing { codes }
    }

    fn code(&self, digit: u8) -> u16 {
        self.codes[(digit & 0x03) as usize]
    }
}

/// One 16-bit word for the shift register cascade.
#[derive(Clone, Copy)]
pub(crate) enum Command {
    /// All strobes and CLR inactive. Sent once at power-up so the outputs
    /// settle in a harmless state.
    Idle,
    /// Pull CLR low. Wipes every module's internal latch while held.
    ClearAssert,
    /// Return CLR high after a clear pulse.
    ClearRelease,
    /// Present a character to one digit of one module. With `strobe` the
    /// target module's write line goes low to commit; without it all five
    /// write lines stay high so data can stage or settle safely.
    Put {
        display: u8,
        digit: u8,
        data: u8,
        strobe: bool,
    },
}

impl Command {
    pub(crate) fn word(self, addressing: &DigitAddressing) -> u16 {
        match self {
            Command::Idle | Command::ClearRelease => CLR | WR_ALL_INACTIVE,
            Command::ClearAssert => WR_ALL_INACTIVE,
            Command::Put {
                display,
                digit,
                data,
                strobe,
            } => {
                let mut word = CLR | WR_ALL_INACTIVE;
                word |= addressing.code(digit);
                word |= (to_display_code(data) as u16) << DATA_SHIFT;
                if strobe {
                    word &= !(1u16 << (WR_FIRST + display));
                }
                word
            }
        }
    }

    pub(crate) fn send<DI>(
        self,
        iface: &mut DI,
        addressing: &DigitAddressing,
    ) -> Result<(), DisplayError>
    where
        DI: ShiftInterface,
    {
        iface.send_word(self.word(addressing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_field(word: u16) -> u8 {
        ((word >> DATA_SHIFT) & 0x7F) as u8
    }

    fn strobe_field(word: u16) -> u16 {
        (word >> WR_FIRST) & 0x1F
    }

    #[test]
    fn it_passes_supported_characters_verbatim() {
        for c in CHAR_MIN..=CHAR_MAX {
            assert_eq!(to_display_code(c), c);
        }
    }

    #[test]
    fn it_maps_unsupported_characters_to_space() {
        assert_eq!(to_display_code(0x7F), 0x20); // DEL
        assert_eq!(to_display_code(0x1F), 0x20);
        assert_eq!(to_display_code(0x00), 0x20);
        assert_eq!(to_display_code(b'a'), 0x20); // lowercase is above 0x5F
    }

    #[test]
    fn it_is_idempotent() {
        for c in 0..=255u8 {
            let mapped = to_display_code(c);
            assert_eq!(to_display_code(mapped), mapped);
        }
    }

    #[test]
    fn it_encodes_the_idle_word() {
        let addressing = DigitAddressing::CASCADE;
        assert_eq!(Command::Idle.word(&addressing), 0x00F9);
        assert_eq!(Command::ClearRelease.word(&addressing), 0x00F9);
        assert_eq!(Command::ClearAssert.word(&addressing), 0x00F8);
    }

    #[test]
    fn it_keeps_all_strobes_high_while_staging() {
        let addressing = DigitAddressing::CASCADE;
        for display in 0..5 {
            for digit in 0..4 {
                let word = Command::Put {
                    display,
                    digit,
                    data: b'A',
                    strobe: false,
                }
                .word(&addressing);
                assert_eq!(strobe_field(word), 0x1F);
                assert_eq!(word & CLR, CLR);
            }
        }
    }

    #[test]
    fn it_pulls_exactly_one_strobe_low_on_commit() {
        let addressing = DigitAddressing::CASCADE;
        for display in 0..5 {
            let word = Command::Put {
                display,
                digit: 0,
                data: b'A',
                strobe: true,
            }
            .word(&addressing);
            let strobes = strobe_field(word);
            assert_eq!(strobes.count_ones(), 4);
            assert_eq!(strobes & (1 << display), 0);
        }
    }

    #[test]
    fn it_places_the_character_in_the_data_field() {
        let addressing = DigitAddressing::CASCADE;
        let word = Command::Put {
            display: 2,
            digit: 1,
            data: b'K',
            strobe: false,
        }
        .word(&addressing);
        assert_eq!(char_field(word), b'K');
        assert_eq!(word & 0x8000, 0); // bit 15 unused
    }

    #[test]
    fn it_substitutes_space_for_unsupported_data() {
        let addressing = DigitAddressing::CASCADE;
        let word = Command::Put {
            display: 0,
            digit: 0,
            data: 0x7F,
            strobe: false,
        }
        .word(&addressing);
        assert_eq!(char_field(word), 0x20);
    }

    #[test]
    fn it_applies_the_configured_digit_codes() {
        let cascade = DigitAddressing::CASCADE;
        let expected = [0x06u16, 0x04, 0x02, 0x00];
        for digit in 0..4u8 {
            let word = Command::Put {
                display: 0,
                digit,
                data: b' ',
                strobe: false,
            }
            .word(&cascade);
            assert_eq!(word & 0x06, expected[digit as usize]);
        }

        let standalone = DigitAddressing::STANDALONE;
        let word = Command::Put {
            display: 0,
            digit: 0,
            data: b' ',
            strobe: false,
        }
        .word(&standalone);
        assert_eq!(word & 0x06, 0x02);
    }
}
