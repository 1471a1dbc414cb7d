// Staleness-gated cache - decides what must be re-fetched and merges results
//
// Owns the persisted record (day/hour pair, freshness flags, one blob per
// category) and the in-memory mirror the renderer reads. Fetch collaborators
// never write persisted state; they hand decoded payloads to the merge
// operations here.
use crate::application::provider::DashboardView;
use crate::application::record_store::RecordStore;
use crate::domain::category::{CategorySet, DataCategory};
use crate::domain::clock::LogicalClock;
use crate::domain::error::PanelError;
use crate::domain::hour_map::local_slot;
use crate::domain::weather::{
    empty_day, CurrentConditions, DailyForecast, HistoryPoint, HourlyForecastPoint, HourlySlot,
    IndoorReading, DAILY_SLOTS, SLOTS_PER_DAY,
};
use crate::infrastructure::codec;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, warn};

const KEY_DAY: &str = "day";
const KEY_HOUR: &str = "hour";
const KEY_STATUS: &str = "status";
const KEY_CURRENT: &str = "current";
const KEY_DAILY: &str = "daily";
const KEY_HOURLY: &str = "hourly";

pub struct WeatherCache {
    store: Arc<dyn RecordStore>,
    tz: Tz,
    current: CurrentConditions,
    daily: Vec<DailyForecast>,
    hourly: [HourlySlot; SLOTS_PER_DAY],
}

impl WeatherCache {
    pub fn new(store: Arc<dyn RecordStore>, tz: Tz) -> Self {
        Self {
            store,
            tz,
            current: CurrentConditions::default(),
            daily: Vec::new(),
            hourly: empty_day(),
        }
    }

    /// Load the persisted records usable at `clock` into memory and return
    /// the set of categories the caller still has to fetch.
    ///
    /// Day rollover voids everything, including the accumulated hourly
    /// slots. Hour rollover within the same day keeps the daily forecast
    /// and the hourly slot contents, but only the daily freshness flag; a
    /// blob that fails to decode downgrades its category regardless of the
    /// flags.
    pub fn load_and_classify(&mut self, clock: LogicalClock) -> CategorySet {
        // Start from an empty mirror; only records proven valid repopulate it.
        self.current = CurrentConditions::default();
        self.daily.clear();
        self.hourly = empty_day();

        let saved_day = self.store.get_u32(KEY_DAY);
        let saved_hour = self.store.get_u32(KEY_HOUR);
        let status = CategorySet::from_bits(self.store.get_u32(KEY_STATUS).unwrap_or(0));

        if saved_day != Some(clock.day_of_year) {
            debug!(
                ?saved_day,
                day = clock.day_of_year,
                "day rollover, discarding all saved records"
            );
            return CategorySet::all();
        }

        let mut fresh = CategorySet::EMPTY;

        // The daily forecast stays valid for the whole day.
        if status.contains(DataCategory::Daily) {
            if let Some(days) = self.read_record(KEY_DAILY, codec::decode_daily) {
                self.daily = days;
                fresh.insert(DataCategory::Daily);
            }
        }

        let same_hour = saved_hour == Some(clock.hour_of_day);
        if !same_hour {
            debug!(
                ?saved_hour,
                hour = clock.hour_of_day,
                "hour rollover, keeping daily forecast only"
            );
        }

        // Current conditions are point-in-time.
        if same_hour && status.contains(DataCategory::Current) {
            if let Some(current) = self.read_record(KEY_CURRENT, codec::decode_current) {
                self.current = current;
                fresh.insert(DataCategory::Current);
            }
        }

        // The hourly array accumulates observations across the whole day, so
        // its blob is reloaded even after an hour rollover; its freshness
        // flags are honored only while the hour still matches.
        if status.contains(DataCategory::HourlyForecast) || status.contains(DataCategory::History) {
            if let Some(slots) = self.read_record(KEY_HOURLY, codec::decode_hourly) {
                self.hourly = slots;
                if same_hour {
                    let hour_scoped = CategorySet::only(DataCategory::HourlyForecast)
                        .with(DataCategory::History);
                    fresh = fresh.union(status.intersection(hour_scoped));
                }
            }
        }

        // Self-check: the flags can claim a fresh forecast while the slot for
        // "now" was never populated (a sensor-only write right after a day
        // rollover does this). Trust the data over the flags and re-fetch the
        // whole hour-scoped group.
        if fresh.contains(DataCategory::HourlyForecast)
            && self.hourly[clock.hour_of_day as usize].has_no_temperature()
        {
            warn!(
                hour = clock.hour_of_day,
                "hourly record empty for current hour, forcing refetch"
            );
            fresh.remove(DataCategory::HourlyForecast);
            fresh.remove(DataCategory::History);
            fresh.remove(DataCategory::Current);
        }

        CategorySet::all().difference(fresh)
    }

    /// Wholesale replacement of the current-conditions snapshot.
    pub fn merge_current(
        &mut self,
        clock: LogicalClock,
        mut payload: CurrentConditions,
    ) -> Result<(), PanelError> {
        payload.valid = true;
        self.current = payload;
        self.persist(
            clock,
            CategorySet::only(DataCategory::Current),
            KEY_CURRENT,
            &codec::encode_current(&self.current),
        )
    }

    /// Wholesale replacement of the multi-day outlook.
    pub fn merge_daily(
        &mut self,
        clock: LogicalClock,
        mut days: Vec<DailyForecast>,
    ) -> Result<(), PanelError> {
        days.truncate(DAILY_SLOTS);
        self.daily = days;
        self.persist(
            clock,
            CategorySet::only(DataCategory::Daily),
            KEY_DAILY,
            &codec::encode_daily(&self.daily),
        )
    }

    /// Bucket forecast points into today's slots. Forecast-owned fields of
    /// all 24 slots are reset first, so hours beyond the fetch window lose
    /// their forecast; observed and indoor fields are never touched. Points
    /// outside today are dropped silently.
    pub fn merge_hourly_forecast(
        &mut self,
        clock: LogicalClock,
        points: &[HourlyForecastPoint],
    ) -> Result<(), PanelError> {
        for slot in self.hourly.iter_mut() {
            slot.clear_forecast();
        }
        let mut placed = 0usize;
        for point in points {
            let Some(idx) = local_slot(point.time_utc, self.tz, clock.day_of_year) else {
                continue;
            };
            let slot = &mut self.hourly[idx];
            slot.forecast_temp = Some(point.temp);
            slot.forecast_rain_prob = Some(point.rain_prob);
            if let Some(pressure) = point.pressure {
                slot.forecast_pressure = Some(pressure);
            }
            placed += 1;
        }
        debug!(placed, received = points.len(), "hourly forecast bucketed");
        self.persist(
            clock,
            CategorySet::only(DataCategory::HourlyForecast),
            KEY_HOURLY,
            &codec::encode_hourly(&self.hourly),
        )
    }

    /// Bucket observed history points into today's slots, writing only the
    /// observed-owned fields of the slots the fetch actually covered.
    pub fn merge_history(
        &mut self,
        clock: LogicalClock,
        points: &[HistoryPoint],
    ) -> Result<(), PanelError> {
        let mut placed = 0usize;
        for point in points {
            let Some(idx) = local_slot(point.time_utc, self.tz, clock.day_of_year) else {
                continue;
            };
            let slot = &mut self.hourly[idx];
            slot.actual_temp = Some(point.temp);
            slot.actual_rain_mm = Some(point.rain_mm);
            if let Some(pressure) = point.pressure {
                slot.actual_pressure = Some(pressure);
            }
            placed += 1;
        }
        debug!(placed, received = points.len(), "history bucketed");
        self.persist(
            clock,
            CategorySet::only(DataCategory::History),
            KEY_HOURLY,
            &codec::encode_hourly(&self.hourly),
        )
    }

    /// Write the local sensor reading into the current hour's slot and the
    /// current-conditions panel. The indoor fields ride in the hourly
    /// record, so even a wake where nothing was stale persists the full
    /// hourly blob through the HourlyForecast flag group.
    pub fn merge_indoor(
        &mut self,
        clock: LogicalClock,
        reading: IndoorReading,
    ) -> Result<(), PanelError> {
        let slot = &mut self.hourly[clock.hour_of_day as usize];
        slot.indoor_temp = Some(reading.temp);
        slot.indoor_pressure = Some(reading.pressure);
        self.current.indoor_temp = Some(reading.temp);
        self.current.indoor_humidity = Some(reading.humidity);
        self.current.indoor_pressure = Some(reading.pressure);
        self.persist(
            clock,
            CategorySet::only(DataCategory::HourlyForecast),
            KEY_HOURLY,
            &codec::encode_hourly(&self.hourly),
        )
    }

    /// Read-only view for the renderer.
    pub fn view(&self) -> DashboardView<'_> {
        DashboardView {
            current: &self.current,
            daily: &self.daily,
            hourly: &self.hourly,
        }
    }

    fn read_record<T>(
        &self,
        key: &str,
        decode: fn(&[u8]) -> Result<T, PanelError>,
    ) -> Option<T> {
        let bytes = self.store.get_blob(key)?;
        match decode(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, "discarding stored record: {e}");
                None
            }
        }
    }

    /// Persist one category's payload and flag, applying the rollover rules
    /// to the flag set first. The payload blob is written before the flag:
    /// a failed blob write must never leave a freshness bit claiming data
    /// that is not there.
    fn persist(
        &self,
        clock: LogicalClock,
        category: CategorySet,
        key: &str,
        payload: &[u8],
    ) -> Result<(), PanelError> {
        let saved_day = self.store.get_u32(KEY_DAY);
        let saved_hour = self.store.get_u32(KEY_HOUR);
        let mut status = CategorySet::from_bits(self.store.get_u32(KEY_STATUS).unwrap_or(0));

        if saved_day != Some(clock.day_of_year) {
            // New day: every previously persisted flag is void.
            status = CategorySet::EMPTY;
            self.store.put_u32(KEY_DAY, clock.day_of_year)?;
            self.store.put_u32(KEY_HOUR, clock.hour_of_day)?;
        } else if saved_hour != Some(clock.hour_of_day) {
            // New hour, same day: only the daily forecast carries over.
            status = status.intersection(CategorySet::only(DataCategory::Daily));
            self.store.put_u32(KEY_HOUR, clock.hour_of_day)?;
        }

        self.store.put_blob(key, payload)?;
        status = status.union(category);
        self.store.put_u32(KEY_STATUS, status.to_bits())?;
        debug!(key, status = %status, "record persisted");
        Ok(())
    }
}
