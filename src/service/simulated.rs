//! Simulated boarding pass backend producing demo flight data

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Local, NaiveDate, NaiveTime};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info};

use super::BoardingPassService;
use crate::errors::ServiceError;
use crate::models::{Airline, BoardingPass, BoardingPassRequest};

const AIRPORTS: [&str; 5] = ["DEL", "BOM", "BLR", "MAA", "HYD"];
const SEAT_LETTERS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Boarding pass backend that waits `delay` and fabricates a plausible pass
#[derive(Debug, Clone)]
pub struct SimulatedService {
    delay: Duration,
    seed: Option<u64>,
}

impl SimulatedService {
    pub fn new(delay: Duration) -> Self {
        Self { delay, seed: None }
    }

    /// Generate the same pass for the same booking on every call
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[async_trait]
impl BoardingPassService for SimulatedService {
    async fn generate(&self, request: BoardingPassRequest) -> Result<BoardingPass, ServiceError> {
        let airline = Airline::from_id(&request.airline)
            .ok_or_else(|| ServiceError::UnsupportedAirline(request.airline.clone()))?;

        debug!("Simulating {} lookup for PNR {}", airline, request.pnr);
        tokio::time::sleep(self.delay).await;

        let mut rng = self.rng();
        let pass = build_boarding_pass(airline, &request, Local::now().date_naive(), &mut rng);
        info!(
            "Generated boarding pass {} for PNR {}",
            pass.flight_number, pass.pnr
        );
        Ok(pass)
    }
}

/// Assemble demo flight details for a booking departing within the next week
pub fn build_boarding_pass<R: Rng>(
    airline: Airline,
    request: &BoardingPassRequest,
    today: NaiveDate,
    rng: &mut R,
) -> BoardingPass {
    let code = airline.code();
    let flight_number = format!("{}-{}", code, rng.gen_range(100..=999));

    let departure = AIRPORTS[rng.gen_range(0..AIRPORTS.len())];
    let arrival = loop {
        let candidate = AIRPORTS[rng.gen_range(0..AIRPORTS.len())];
        if candidate != departure {
            break candidate;
        }
    };

    let date = today + ChronoDuration::days(rng.gen_range(1..=7));

    let departure_time = NaiveTime::from_hms_opt(rng.gen_range(0..24), rng.gen_range(0..60), 0)
        .unwrap_or(NaiveTime::MIN);
    // Wraps past midnight for early departures
    let boarding_time = departure_time - ChronoDuration::minutes(30);

    let seat_letter = SEAT_LETTERS.choose(rng).copied().unwrap_or('A');
    let seat = format!("{}{}", rng.gen_range(1..=30), seat_letter);
    let gate = format!("G{}", rng.gen_range(1..=20));

    BoardingPass {
        passenger_name: request.last_name.to_uppercase(),
        flight_number,
        departure: departure.to_string(),
        arrival: arrival.to_string(),
        date,
        seat,
        gate,
        boarding_time: boarding_time.format("%H:%M").to_string(),
        pnr: request.pnr.clone(),
        booking_reference: Some(format!("{}{}", code, rng.gen_range(100_000..=999_999))),
    }
}
