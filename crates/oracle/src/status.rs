//! Flight status codes and the random draw.

use rand::Rng;
use std::fmt;

/// Status an oracle reports for a flight.
///
/// The contract accepts exactly these six codes; `LateAirline` is the one
/// that triggers insurance payouts, but that rule lives in the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FlightStatus {
    /// No verdict yet.
    Unknown = 0,
    /// Flight on time.
    OnTime = 10,
    /// Late, airline's fault.
    LateAirline = 20,
    /// Late due to weather.
    LateWeather = 30,
    /// Late due to a technical problem.
    LateTechnical = 40,
    /// Late for any other reason.
    LateOther = 50,
}

impl FlightStatus {
    /// Every status the contract accepts.
    pub const ALL: [FlightStatus; 6] = [
        FlightStatus::Unknown,
        FlightStatus::OnTime,
        FlightStatus::LateAirline,
        FlightStatus::LateWeather,
        FlightStatus::LateTechnical,
        FlightStatus::LateOther,
    ];

    /// Wire code of the status.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Parses a wire code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }

    /// Draws a status uniformly at random.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlightStatus::Unknown => "unknown",
            FlightStatus::OnTime => "on time",
            FlightStatus::LateAirline => "late (airline)",
            FlightStatus::LateWeather => "late (weather)",
            FlightStatus::LateTechnical => "late (technical)",
            FlightStatus::LateOther => "late (other)",
        };
        write!(f, "{name}")
    }
}
