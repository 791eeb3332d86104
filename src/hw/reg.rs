//! Bit-field map of the VCNL4010 registers 0x80 to 0x8F

use super::Registry;
use crate::impl_register;
use crate::rutil::BitField;

//NOTE: the register doc must directly follow `{`, since the macro expects exactly one there
impl_register! {
    0x80, 1, COMMAND {/// Command register #0
        /// Enables the state machine and LP oscillator for self timed measurements.
        /// No measurement is performed until the corresponding enable bit is set.
        SELFTIMED_EN, 0, 0, RW, 0x00, ["DISABLE" => 0, "ENABLE" => 1];
        /// Enables periodic proximity measurement
        PROX_EN, 1, 1, RW, 0x00, ["DISABLE" => 0, "ENABLE" => 1];
        /// Enables periodic ambient light measurement
        ALS_EN, 2, 2, RW, 0x00, ["DISABLE" => 0, "ENABLE" => 1];
        /// Starts a single on-demand proximity measurement.
        /// The result is available in registers #7 and #8 at the end of conversion.
        PROX_OD, 3, 3, RW, 0x00, ["TRIGGER" => 1];
        /// Starts a single on-demand ambient light measurement.
        /// With averaging enabled a sequence of readings is averaged; the
        /// result is available in registers #5 and #6 at the end of conversion.
        ALS_OD, 4, 4, RW, 0x00, ["TRIGGER" => 1];
        /// Set while proximity data is available, cleared by reading register #7 or #8
        PROX_DATA_RDY, 5, 5, RO, 0x00, ["NOT_READY" => 0, "READY" => 1];
        /// Set while ambient light data is available, cleared by reading register #5 or #6
        ALS_DATA_RDY, 6, 6, RO, 0x00, ["NOT_READY" => 0, "READY" => 1];
        /// Reads as 1
        CONFIG_LOCK, 7, 7, RO, 0x01, ["UNLOCKED" => 0, "LOCKED" => 1];
    }
    0x81, 1, PRODUCT_ID_REVISION {/// Product ID revision register #1
        /// Silicon revision
        REVISION_ID, 0, 3, RO, 0x01, [];
        /// Product ID, 2 for this device
        PRODUCT_ID, 4, 7, RO, 0x02, [];
    }
    0x82, 1, PROXIMITY_RATE {/// Proximity rate register #2
        /// Proximity measurements per second
        PROXIMITY_RATE, 0, 2, RW, 0x00, [
            "1.95 meas/s" => 0, "3.9 meas/s" => 1, "7.8 meas/s" => 2, "16.6 meas/s" => 3,
            "31 meas/s" => 4, "62 meas/s" => 5, "125 meas/s" => 6, "250 meas/s" => 7,
        ];
    }
    0x83, 1, IR_LED_CURRENT {/// IR LED current register #3
        /// LED current in steps of 10 mA, limited to 200 mA above 20
        IR_LED_CURRENT, 0, 4, RW, 0x02, [];
    }
    0x84, 1, AMBIENT_PARAMETER {/// Ambient light parameter register #4
        /// Single conversions averaged per measurement cycle, 2 ^ value
        AMBIENT_AVERAGING, 0, 2, RW, 0x05, [
            "1 conv" => 0, "2 conv" => 1, "4 conv" => 2, "8 conv" => 3,
            "16 conv" => 4, "32 conv" => 5, "64 conv" => 6, "128 conv" => 7,
        ];
        /// Measure the offset before each ambient light measurement and subtract it
        AMBIENT_AUTO_OFFSET_COMP, 3, 3, RW, 0x01, ["DISABLE" => 0, "ENABLE" => 1];
        /// Ambient light measurements per second
        AMBIENT_ALS_RATE, 4, 6, RW, 0x01, [
            "1 samp/s" => 0, "2 samp/s" => 1, "3 samp/s" => 2, "4 samp/s" => 3,
            "5 samp/s" => 4, "6 samp/s" => 5, "8 samp/s" => 6, "10 samp/s" => 7,
        ];
        /// Continuous conversion mode for faster ambient light measurements
        AMBIENT_CONT_CONV_MODE, 7, 7, RW, 0x00, ["DISABLE" => 0, "ENABLE" => 1];
    }
    0x85, 2, AMBIENT_RESULT {/// Ambient light result registers #5 and #6
        /// Latest ambient light measurement
        AMBIENT_RESULT, 0, 15, RO, 0x0000, [];
    }
    0x87, 2, PROXIMITY_RESULT {/// Proximity result registers #7 and #8
        /// Latest proximity measurement
        PROX_RESULT, 0, 15, RO, 0x0000, [];
    }
    0x89, 1, INT_CTRL {/// Interrupt control register #9
        /// Selects which measurement the thresholds apply to
        INT_THRES_SEL, 0, 0, RW, 0x00, ["PROX_SEL" => 0, "ALS_SEL" => 1];
        /// Interrupt when the high or low threshold is exceeded
        INT_THRES_EN, 1, 1, RW, 0x00, ["DISABLE" => 0, "ENABLE" => 1];
        /// Interrupt on ambient light data ready
        INT_ALS_DATA_RDY_EN, 2, 2, RW, 0x00, ["DISABLE" => 0, "ENABLE" => 1];
        /// Interrupt on proximity data ready
        INT_PROX_DATA_RDY_EN, 3, 3, RW, 0x00, ["DISABLE" => 0, "ENABLE" => 1];
        /// Consecutive measurements above/below the threshold needed, 2 ^ value
        INT_COUNT_EXCEED, 5, 7, RW, 0x00, [
            "1 cnt" => 0, "2 cnt" => 1, "4 cnt" => 2, "8 cnt" => 3,
            "16 cnt" => 4, "32 cnt" => 5, "64 cnt" => 6, "128 cnt" => 7,
        ];
    }
    0x8A, 2, LOW_THRESHOLD {/// Low threshold registers #10 and #11
        /// Interrupt when the selected measurement drops below this value
        LOW_THRES, 0, 15, RW, 0x0000, [];
    }
    0x8C, 2, HIGH_THRESHOLD {/// High threshold registers #12 and #13
        /// Interrupt when the selected measurement rises above this value
        HIGH_THRES, 0, 15, RW, 0xFFFF, [];
    }
    0x8E, 1, INT_STATUS {/// Interrupt status register #14, write 1 to clear
        /// High threshold exceeded
        INT_TH_HI, 0, 0, RW, 0x00, ["NOT_EXCEEDED" => 0, "EXCEEDED" => 1], INT_STATUS;
        /// Low threshold exceeded
        INT_TH_LOW, 1, 1, RW, 0x00, ["NOT_EXCEEDED" => 0, "EXCEEDED" => 1], INT_STATUS;
        /// Ambient light data ready
        INT_ALS_DATA_RDY, 2, 2, RW, 0x00, ["NOT_SET" => 0, "SET" => 1], INT_STATUS;
        /// Proximity data ready
        INT_PROX_DATA_RDY, 3, 3, RW, 0x00, ["NOT_SET" => 0, "SET" => 1], INT_STATUS;
    }
    0x8F, 1, MODULATOR_TIMING {/// Proximity modulator timing adjustment register #15
        /// Dead time in the evaluation of the IR signal at its slopes
        MODULATION_DEAD_TIME, 0, 2, RW, 0x01, [];
        /// Frequency of the square IR measurement signal
        PROXIMITY_FREQUENCY, 3, 4, RW, 0x00, [
            "390.625 kHz" => 0, "781.25 kHz" => 1, "1.5625 MHz" => 2, "3.125 MHz" => 3,
        ];
        /// Delay between the IR LED signal and the IR input evaluation
        MODULATION_DELAY_TIME, 5, 7, RW, 0x00, [];
    }
}

/// Interrupt status flags, acknowledged by writing 1
pub const STATUS_FLAGS: &[&BitField] = &[
    &int_status::INT_TH_HI,
    &int_status::INT_TH_LOW,
    &int_status::INT_ALS_DATA_RDY,
    &int_status::INT_PROX_DATA_RDY,
];

/// The register map of the device
pub static REGISTRY: Registry = Registry::new(FIELDS, STATUS_FLAGS);
