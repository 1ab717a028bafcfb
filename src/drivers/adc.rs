// HealthBand - One-shot ADC Driver
//
// Bio-signal input on ADC1 via raw ESP-IDF one-shot calls, 12-bit, 11 dB
// attenuation (0-3.3 V). Reads return the raw count, uncalibrated.

use esp_idf_svc::sys::{self, esp};

use crate::sensors::AnalogInput;

pub struct OneshotAdc {
    handle: sys::adc_oneshot_unit_handle_t,
    channel: sys::adc_channel_t,
    last: u16,
}

impl OneshotAdc {
    /// Claim ADC1 and configure `channel` (ADC1_CH2 = GPIO3 on the ESP32-S2).
    pub fn new(channel: sys::adc_channel_t) -> anyhow::Result<Self> {
        let mut handle: sys::adc_oneshot_unit_handle_t = core::ptr::null_mut();

        // SAFETY: plain FFI configuration calls; `handle` is written by the
        // driver before it is used and stays valid for the firmware lifetime.
        unsafe {
            let unit_cfg = sys::adc_oneshot_unit_init_cfg_t {
                unit_id: sys::adc_unit_t_ADC_UNIT_1,
                ulp_mode: sys::adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
                ..core::mem::zeroed()
            };
            esp!(sys::adc_oneshot_new_unit(&unit_cfg, &mut handle))?;

            let chan_cfg = sys::adc_oneshot_chan_cfg_t {
                atten: sys::adc_atten_t_ADC_ATTEN_DB_11,
                bitwidth: sys::adc_bitwidth_t_ADC_BITWIDTH_12,
            };
            esp!(sys::adc_oneshot_config_channel(handle, channel, &chan_cfg))?;
        }

        log::info!("Bio-signal ADC ready (ADC1 channel {})", channel);
        Ok(Self { handle, channel, last: 0 })
    }
}

impl AnalogInput for OneshotAdc {
    /// A failed conversion repeats the previous value.
    fn read_raw(&mut self) -> u16 {
        let mut raw: i32 = 0;
        // SAFETY: `handle` was initialised in `new` and is never freed.
        let ret = unsafe { sys::adc_oneshot_read(self.handle, self.channel, &mut raw) };
        if ret == sys::ESP_OK {
            self.last = raw.clamp(0, i32::from(u16::MAX)) as u16;
        } else {
            log::debug!("ADC read failed ({}), repeating {}", ret, self.last);
        }
        self.last
    }
}
