//! Hazard advisories and activity suggestions derived from a single
//! [`WeatherObservation`].
//!
//! Every function here is pure: the same observation always yields the same
//! result, and a missing optional reading never fails, it only prevents the
//! rule that needs it from firing.

use serde::Serialize;

use crate::model::WeatherObservation;

const STORM_WIND_MPS: f64 = 20.0;
const STORM_HUMIDITY_PCT: u8 = 70;
const STORM_PRESSURE_HPA: f64 = 1000.0;

const HURRICANE_WIND_MPS: f64 = 33.0;
const HURRICANE_PRESSURE_HPA: f64 = 980.0;

const FLOOD_RAIN_MM: f64 = 50.0;
const FLOOD_HEAVY_RAIN_MM: f64 = 100.0;
const FLOOD_HUMIDITY_PCT: u8 = 85;

/// A hazard flag together with the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub detected: bool,
    pub message: &'static str,
}

impl Advisory {
    fn pick(detected: bool, alert: &'static str, clear: &'static str) -> Self {
        Self {
            detected,
            message: if detected { alert } else { clear },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Indoor,
    OutdoorWalk,
    Winter,
    WarmWeather,
    ColdWeather,
    Windy,
    TypicalDay,
}

impl Activity {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Indoor => {
                "It's a wet day. Consider indoor activities like a museum, a cinema or a cozy cafe."
            }
            Self::OutdoorWalk => "Perfect weather for a walk in the park or a bike ride!",
            Self::Winter => "Snow outside! A good day for sledding, skiing or building a snowman.",
            Self::WarmWeather => "It's warm out. Head to the beach or a pool, and stay hydrated.",
            Self::ColdWeather => "It's cold. Dress in layers, or enjoy a hot drink indoors.",
            Self::Windy => "It's windy. Great for flying a kite, but secure loose objects.",
            Self::TypicalDay => "A typical day. Enjoy your usual activities!",
        }
    }
}

/// Everything the advisor concludes about one observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryResult {
    pub storm: Advisory,
    pub hurricane: Advisory,
    pub flood: Advisory,
    pub activity: Activity,
    pub activity_suggestion: &'static str,
}

fn below(pressure: Option<f64>, limit: f64) -> bool {
    pressure.is_some_and(|p| p < limit)
}

pub fn classify_storm(obs: &WeatherObservation) -> Advisory {
    let detected = obs.wind_speed() > STORM_WIND_MPS
        && obs.humidity() > STORM_HUMIDITY_PCT
        && below(obs.pressure(), STORM_PRESSURE_HPA);

    Advisory::pick(
        detected,
        "Storm alert: High winds and low pressure detected!",
        "No storm detected.",
    )
}

pub fn classify_hurricane(obs: &WeatherObservation) -> Advisory {
    let detected =
        obs.wind_speed() > HURRICANE_WIND_MPS && below(obs.pressure(), HURRICANE_PRESSURE_HPA);

    Advisory::pick(
        detected,
        "Hurricane warning: Extremely high winds and low pressure!",
        "No hurricane detected.",
    )
}

/// Flags heavy rainfall over the last hour.
///
/// The heavy-rain-and-humid clause can never fire on its own: anything above
/// 100 mm is already above 50 mm. It is kept so the thresholds stay exactly
/// as published.
pub fn classify_flood(obs: &WeatherObservation) -> Advisory {
    let rain = obs.rainfall_last_hour();
    let detected = rain > FLOOD_RAIN_MM
        || (rain > FLOOD_HEAVY_RAIN_MM && obs.humidity() > FLOOD_HUMIDITY_PCT);

    Advisory::pick(
        detected,
        "Flood risk alert: Heavy rainfall detected!",
        "No flood detected.",
    )
}

struct ActivityRule {
    applies: fn(&WeatherObservation) -> bool,
    activity: Activity,
}

fn is_wet(o: &WeatherObservation) -> bool {
    o.description().contains("rain") || o.description().contains("thunderstorm")
}

fn is_mild_and_clear(o: &WeatherObservation) -> bool {
    o.description().contains("clear")
        && o.temperature() > 15.0
        && o.temperature() < 25.0
        && o.wind_speed() < 5.0
}

fn is_snowy(o: &WeatherObservation) -> bool {
    o.description().contains("snow")
}

fn is_warm(o: &WeatherObservation) -> bool {
    o.temperature() > 25.0
}

fn is_cold(o: &WeatherObservation) -> bool {
    o.temperature() < 10.0
}

fn is_windy(o: &WeatherObservation) -> bool {
    o.wind_speed() > 15.0
}

/// Evaluated top to bottom; the first matching rule wins.
const ACTIVITY_RULES: &[ActivityRule] = &[
    ActivityRule {
        applies: is_wet,
        activity: Activity::Indoor,
    },
    ActivityRule {
        applies: is_mild_and_clear,
        activity: Activity::OutdoorWalk,
    },
    ActivityRule {
        applies: is_snowy,
        activity: Activity::Winter,
    },
    ActivityRule {
        applies: is_warm,
        activity: Activity::WarmWeather,
    },
    ActivityRule {
        applies: is_cold,
        activity: Activity::ColdWeather,
    },
    ActivityRule {
        applies: is_windy,
        activity: Activity::Windy,
    },
];

pub fn suggest_activity(obs: &WeatherObservation) -> Activity {
    ACTIVITY_RULES
        .iter()
        .find(|rule| (rule.applies)(obs))
        .map_or(Activity::TypicalDay, |rule| rule.activity)
}

pub fn advise(obs: &WeatherObservation) -> AdvisoryResult {
    let activity = suggest_activity(obs);

    AdvisoryResult {
        storm: classify_storm(obs),
        hurricane: classify_hurricane(obs),
        flood: classify_flood(obs),
        activity,
        activity_suggestion: activity.message(),
    }
}
