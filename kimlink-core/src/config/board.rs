//! Host board pinout table
//!
//! The KIM interface shield is wired differently on each Arduino-class
//! board. Boards without a spare hardware UART on the shield pins drive
//! the module through a software UART, which has to be rebuilt on every
//! power-on.

/// Pinout of the KIM shield on one host board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardProfile {
    /// Board name
    pub name: &'static str,
    /// User wakeup line (USER_INT)
    pub wakeup_pin: u8,
    /// Power enable line (ON_OFF)
    pub power_pin: u8,
    /// Host RX, wired to the module's TX
    pub rx_pin: u8,
    /// Host TX, wired to the module's RX
    pub tx_pin: u8,
    /// Module is driven through a software UART
    pub soft_serial: bool,
}

impl BoardProfile {
    /// WeMos D1 (ESP8266), pins D3/D4/D7/D8
    pub const WEMOS_D1: Self = Self {
        name: "wemos-d1",
        wakeup_pin: 0,
        power_pin: 2,
        rx_pin: 13,
        tx_pin: 15,
        soft_serial: true,
    };

    /// Arduino Uno WiFi Rev2 (ATmega4809)
    pub const UNO_WIFI_REV2: Self = Self {
        name: "uno-wifi-rev2",
        wakeup_pin: 3,
        power_pin: 4,
        rx_pin: 0,
        tx_pin: 1,
        soft_serial: false,
    };

    /// Arduino Uno (ATmega328P)
    pub const UNO: Self = Self {
        name: "uno",
        wakeup_pin: 3,
        power_pin: 4,
        rx_pin: 7,
        tx_pin: 8,
        soft_serial: true,
    };

    /// Arduino MKR WiFi 1010 (SAMD21)
    pub const MKR_WIFI_1010: Self = Self {
        name: "mkr-wifi-1010",
        wakeup_pin: 3,
        power_pin: 1,
        rx_pin: 13,
        tx_pin: 14,
        soft_serial: false,
    };

    /// Arduino Nano 33 BLE (nRF52840)
    pub const NANO_33_BLE: Self = Self {
        name: "nano-33-ble",
        wakeup_pin: 3,
        power_pin: 2,
        rx_pin: 0,
        tx_pin: 1,
        soft_serial: false,
    };

    /// Profile used when the board is not in the table
    pub const FALLBACK: Self = Self::NANO_33_BLE;

    /// Look up a board by name (ASCII case-insensitive)
    pub fn find(name: &str) -> Option<&'static BoardProfile> {
        BOARDS
            .iter()
            .find(|board| board.name.eq_ignore_ascii_case(name))
    }

    /// Look up a board by name, falling back to [`Self::FALLBACK`]
    pub fn find_or_fallback(name: &str) -> BoardProfile {
        Self::find(name).copied().unwrap_or(Self::FALLBACK)
    }

    /// Check that no two control/serial lines share a pin
    pub fn pins_distinct(&self) -> bool {
        let pins = [self.wakeup_pin, self.power_pin, self.rx_pin, self.tx_pin];
        pins.iter()
            .enumerate()
            .all(|(i, pin)| !pins[i + 1..].contains(pin))
    }
}

/// Every supported board
pub static BOARDS: &[BoardProfile] = &[
    BoardProfile::WEMOS_D1,
    BoardProfile::UNO_WIFI_REV2,
    BoardProfile::UNO,
    BoardProfile::MKR_WIFI_1010,
    BoardProfile::NANO_33_BLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_board() {
        let uno = BoardProfile::find("uno").unwrap();
        assert_eq!(uno.rx_pin, 7);
        assert_eq!(uno.tx_pin, 8);
        assert!(uno.soft_serial);

        // Case-insensitive
        assert_eq!(BoardProfile::find("MKR-WiFi-1010"), Some(&BoardProfile::MKR_WIFI_1010));
        assert_eq!(BoardProfile::find("teensy"), None);
    }

    #[test]
    fn test_fallback_is_nano() {
        let board = BoardProfile::find_or_fallback("unknown-board");
        assert_eq!(board, BoardProfile::NANO_33_BLE);
        assert_eq!(board.power_pin, 2);
    }

    #[test]
    fn test_table_is_consistent() {
        for (i, board) in BOARDS.iter().enumerate() {
            assert!(board.pins_distinct(), "{} reuses a pin", board.name);
            // Names are unique
            assert!(BOARDS[i + 1..].iter().all(|other| other.name != board.name));
        }
    }

    #[test]
    fn test_pins_distinct_detects_clash() {
        let mut board = BoardProfile::UNO;
        board.power_pin = board.wakeup_pin;
        assert!(!board.pins_distinct());
    }
}
