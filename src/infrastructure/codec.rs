// Fixed-size binary records for the persisted cache blobs
//
// Little-endian, fixed layout per record so a size mismatch on read is
// detectable as corruption. `None` fields are stored as reserved sentinel
// values (a temperature below any physical reading, negative percentages)
// and decoded back to `None`; sentinels exist only on disk.
use crate::domain::error::PanelError;
use crate::domain::weather::{
    empty_day, CurrentConditions, DailyForecast, HourlySlot, DAILY_SLOTS, SLOTS_PER_DAY,
};

const CONDITION_CAP: usize = 64;
const ICON_CAP: usize = 32;
const DAY_NAME_CAP: usize = 16;
const CLOCK_CAP: usize = 8;

const NO_TEMP: f64 = -100.0;
const NO_RAIN_PROB: i32 = -1;
const NO_PRESSURE: f64 = -1.0;
const NO_RAIN_MM: f64 = -1.0;
const NO_HUMIDITY: f64 = -1.0;

/// Encoded length of the current-conditions record.
pub const CURRENT_LEN: usize = CONDITION_CAP + ICON_CAP + 4 * 8 + 5 * 4 + 3 * 8 + 1;

const DAILY_ENTRY_LEN: usize = DAY_NAME_CAP + ICON_CAP + CONDITION_CAP + 2 * 8 + 2 * CLOCK_CAP + 2 * 8;

/// Encoded length of the daily-forecast record (always `DAILY_SLOTS` entries).
pub const DAILY_LEN: usize = DAILY_SLOTS * DAILY_ENTRY_LEN;

const SLOT_LEN: usize = 7 * 8 + 4;

/// Encoded length of the 24-slot hourly record.
pub const HOURLY_LEN: usize = SLOTS_PER_DAY * SLOT_LEN;

struct Writer(Vec<u8>);

impl Writer {
    fn with_capacity(len: usize) -> Self {
        Writer(Vec::with_capacity(len))
    }

    fn f64(&mut self, v: f64) {
        self.0.extend_from_slice(&v.to_le_bytes());
    }

    fn i32(&mut self, v: i32) {
        self.0.extend_from_slice(&v.to_le_bytes());
    }

    fn bool(&mut self, v: bool) {
        self.0.push(u8::from(v));
    }

    /// Fixed-capacity NUL-padded string, truncated on a char boundary.
    fn str(&mut self, s: &str, cap: usize) {
        let mut end = s.len().min(cap);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.0.extend_from_slice(&s.as_bytes()[..end]);
        self.0.resize(self.0.len() + (cap - end), 0);
    }

    fn finish(self) -> Vec<u8> {
        self.0
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    fn f64(&mut self) -> f64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.buf[self.pos..self.pos + 8]);
        self.pos += 8;
        f64::from_le_bytes(raw)
    }

    fn i32(&mut self) -> i32 {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.buf[self.pos..self.pos + 4]);
        self.pos += 4;
        i32::from_le_bytes(raw)
    }

    fn bool(&mut self) -> bool {
        let v = self.buf[self.pos];
        self.pos += 1;
        v != 0
    }

    fn str(&mut self, cap: usize) -> String {
        let raw = &self.buf[self.pos..self.pos + cap];
        self.pos += cap;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(cap);
        String::from_utf8_lossy(&raw[..end]).into_owned()
    }
}

fn expect_len(bytes: &[u8], expected: usize) -> Result<(), PanelError> {
    if bytes.len() != expected {
        return Err(PanelError::StorageReadCorrupt {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

fn opt_f64(v: Option<f64>, sentinel: f64) -> f64 {
    v.unwrap_or(sentinel)
}

fn decode_opt_f64(v: f64, sentinel: f64) -> Option<f64> {
    if v == sentinel { None } else { Some(v) }
}

pub fn encode_current(c: &CurrentConditions) -> Vec<u8> {
    let mut w = Writer::with_capacity(CURRENT_LEN);
    w.str(&c.condition_text, CONDITION_CAP);
    w.str(&c.icon_name, ICON_CAP);
    w.f64(c.temp);
    w.f64(c.feels_like);
    w.f64(c.wind_speed);
    w.f64(c.wind_gust);
    w.i32(c.wind_direction);
    w.i32(c.humidity);
    w.i32(c.precipitation_probability);
    w.i32(c.uv_index);
    w.i32(c.pressure);
    w.f64(opt_f64(c.indoor_temp, NO_TEMP));
    w.f64(opt_f64(c.indoor_humidity, NO_HUMIDITY));
    w.f64(opt_f64(c.indoor_pressure, NO_PRESSURE));
    w.bool(c.valid);
    w.finish()
}

pub fn decode_current(bytes: &[u8]) -> Result<CurrentConditions, PanelError> {
    expect_len(bytes, CURRENT_LEN)?;
    let mut r = Reader::new(bytes);
    Ok(CurrentConditions {
        condition_text: r.str(CONDITION_CAP),
        icon_name: r.str(ICON_CAP),
        temp: r.f64(),
        feels_like: r.f64(),
        wind_speed: r.f64(),
        wind_gust: r.f64(),
        wind_direction: r.i32(),
        humidity: r.i32(),
        precipitation_probability: r.i32(),
        uv_index: r.i32(),
        pressure: r.i32(),
        indoor_temp: decode_opt_f64(r.f64(), NO_TEMP),
        indoor_humidity: decode_opt_f64(r.f64(), NO_HUMIDITY),
        indoor_pressure: decode_opt_f64(r.f64(), NO_PRESSURE),
        valid: r.bool(),
    })
}

/// Always writes `DAILY_SLOTS` entries; shorter input is padded with empty
/// entries so the record length never varies.
pub fn encode_daily(days: &[DailyForecast]) -> Vec<u8> {
    let empty = DailyForecast::default();
    let mut w = Writer::with_capacity(DAILY_LEN);
    for i in 0..DAILY_SLOTS {
        let d = days.get(i).unwrap_or(&empty);
        w.str(&d.day_name, DAY_NAME_CAP);
        w.str(&d.icon_name, ICON_CAP);
        w.str(&d.condition_text, CONDITION_CAP);
        w.f64(d.temp_high);
        w.f64(d.temp_low);
        w.str(&d.sunrise, CLOCK_CAP);
        w.str(&d.sunset, CLOCK_CAP);
        w.f64(d.sunrise_hour);
        w.f64(d.sunset_hour);
    }
    w.finish()
}

pub fn decode_daily(bytes: &[u8]) -> Result<Vec<DailyForecast>, PanelError> {
    expect_len(bytes, DAILY_LEN)?;
    let mut r = Reader::new(bytes);
    let mut days = Vec::with_capacity(DAILY_SLOTS);
    for _ in 0..DAILY_SLOTS {
        days.push(DailyForecast {
            day_name: r.str(DAY_NAME_CAP),
            icon_name: r.str(ICON_CAP),
            condition_text: r.str(CONDITION_CAP),
            temp_high: r.f64(),
            temp_low: r.f64(),
            sunrise: r.str(CLOCK_CAP),
            sunset: r.str(CLOCK_CAP),
            sunrise_hour: r.f64(),
            sunset_hour: r.f64(),
        });
    }
    Ok(days)
}

pub fn encode_hourly(slots: &[HourlySlot; SLOTS_PER_DAY]) -> Vec<u8> {
    let mut w = Writer::with_capacity(HOURLY_LEN);
    for slot in slots {
        w.f64(opt_f64(slot.forecast_temp, NO_TEMP));
        w.i32(slot.forecast_rain_prob.map(i32::from).unwrap_or(NO_RAIN_PROB));
        w.f64(opt_f64(slot.forecast_pressure, NO_PRESSURE));
        w.f64(opt_f64(slot.actual_temp, NO_TEMP));
        w.f64(opt_f64(slot.actual_rain_mm, NO_RAIN_MM));
        w.f64(opt_f64(slot.actual_pressure, NO_PRESSURE));
        w.f64(opt_f64(slot.indoor_temp, NO_TEMP));
        w.f64(opt_f64(slot.indoor_pressure, NO_PRESSURE));
    }
    w.finish()
}

pub fn decode_hourly(bytes: &[u8]) -> Result<[HourlySlot; SLOTS_PER_DAY], PanelError> {
    expect_len(bytes, HOURLY_LEN)?;
    let mut r = Reader::new(bytes);
    let mut slots = empty_day();
    for slot in slots.iter_mut() {
        slot.forecast_temp = decode_opt_f64(r.f64(), NO_TEMP);
        let prob = r.i32();
        slot.forecast_rain_prob = if prob < 0 { None } else { Some(prob as u8) };
        slot.forecast_pressure = decode_opt_f64(r.f64(), NO_PRESSURE);
        slot.actual_temp = decode_opt_f64(r.f64(), NO_TEMP);
        slot.actual_rain_mm = decode_opt_f64(r.f64(), NO_RAIN_MM);
        slot.actual_pressure = decode_opt_f64(r.f64(), NO_PRESSURE);
        slot.indoor_temp = decode_opt_f64(r.f64(), NO_TEMP);
        slot.indoor_pressure = decode_opt_f64(r.f64(), NO_PRESSURE);
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_current() -> CurrentConditions {
        CurrentConditions {
            condition_text: "Partly cloudy".to_string(),
            icon_name: "partly_cloudy".to_string(),
            temp: 21.4,
            feels_like: 19.8,
            wind_speed: 14.0,
            wind_gust: 22.5,
            wind_direction: 225,
            humidity: 63,
            precipitation_probability: 20,
            uv_index: 7,
            pressure: 1016,
            indoor_temp: Some(23.2),
            indoor_humidity: None,
            indoor_pressure: Some(1014.8),
            valid: true,
        }
    }

    #[test]
    fn test_current_round_trip() {
        let original = sample_current();
        let bytes = encode_current(&original);
        assert_eq!(bytes.len(), CURRENT_LEN);
        let decoded = decode_current(&bytes).unwrap();
        assert_eq!(decoded, original);
        // Re-encoding the decoded value reproduces the exact bytes.
        assert_eq!(encode_current(&decoded), bytes);
    }

    #[test]
    fn test_daily_round_trip() {
        let days: Vec<DailyForecast> = (0..DAILY_SLOTS)
            .map(|i| DailyForecast {
                day_name: format!("Day{}", i),
                icon_name: "rain".to_string(),
                condition_text: "Rain".to_string(),
                temp_high: 18.0 + i as f64,
                temp_low: 11.0 + i as f64,
                sunrise: "06:31".to_string(),
                sunset: "20:14".to_string(),
                sunrise_hour: 6.52,
                sunset_hour: 20.23,
            })
            .collect();
        let bytes = encode_daily(&days);
        assert_eq!(bytes.len(), DAILY_LEN);
        let decoded = decode_daily(&bytes).unwrap();
        assert_eq!(decoded, days);
        assert_eq!(encode_daily(&decoded), bytes);
    }

    #[test]
    fn test_hourly_round_trip_preserves_none() {
        let mut slots = empty_day();
        slots[7].forecast_temp = Some(16.5);
        slots[7].forecast_rain_prob = Some(0);
        slots[14].actual_temp = Some(22.0);
        slots[14].actual_rain_mm = Some(0.0);
        slots[14].indoor_temp = Some(24.0);
        let bytes = encode_hourly(&slots);
        assert_eq!(bytes.len(), HOURLY_LEN);
        let decoded = decode_hourly(&bytes).unwrap();
        assert_eq!(decoded, slots);
        assert_eq!(encode_hourly(&decoded), bytes);
        // Zero is data, not absence.
        assert_eq!(decoded[7].forecast_rain_prob, Some(0));
        assert_eq!(decoded[14].actual_rain_mm, Some(0.0));
        assert_eq!(decoded[0].forecast_temp, None);
    }

    #[test]
    fn test_short_blob_is_corrupt() {
        let bytes = encode_hourly(&empty_day());
        let err = decode_hourly(&bytes[..bytes.len() - 1]).unwrap_err();
        match err {
            PanelError::StorageReadCorrupt { expected, actual } => {
                assert_eq!(expected, HOURLY_LEN);
                assert_eq!(actual, HOURLY_LEN - 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_overlong_strings_truncate_on_char_boundary() {
        let mut current = sample_current();
        current.condition_text = "é".repeat(40); // 80 bytes of UTF-8
        let bytes = encode_current(&current);
        assert_eq!(bytes.len(), CURRENT_LEN);
        let decoded = decode_current(&bytes).unwrap();
        assert!(decoded.condition_text.chars().all(|c| c == 'é'));
        assert!(decoded.condition_text.len() <= 64);
    }

    #[test]
    fn test_short_daily_input_pads_to_fixed_length() {
        let one = vec![DailyForecast {
            day_name: "Monday".to_string(),
            ..DailyForecast::default()
        }];
        let bytes = encode_daily(&one);
        assert_eq!(bytes.len(), DAILY_LEN);
        let decoded = decode_daily(&bytes).unwrap();
        assert_eq!(decoded.len(), DAILY_SLOTS);
        assert_eq!(decoded[0].day_name, "Monday");
        assert_eq!(decoded[4], DailyForecast::default());
    }
}
