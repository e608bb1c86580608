use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use crate::controller::{FormController, Phase};
use crate::models::{Airline, AirlineInfo, FieldName, ResultState};
use crate::service::BoardingPassService;

#[derive(Parser)]
#[command(name = "boardpass")]
#[command(about = "Request airline boarding passes by PNR and last name")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive form (default)
    Tui,

    /// List supported airlines
    Airlines {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit the form without the interactive UI
    Generate {
        /// Airline identifier (indigo, airindia, spicejet, akasa)
        #[arg(short, long)]
        airline: String,

        /// 6-character booking reference
        #[arg(short, long)]
        pnr: String,

        /// Passenger's last name
        #[arg(short = 'n', long)]
        last_name: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Render the supported airline table
pub fn format_airlines(json: bool) -> Result<String> {
    if json {
        let airlines: Vec<AirlineInfo> = Airline::ALL.iter().map(|a| a.info()).collect();
        return Ok(serde_json::to_string_pretty(&serde_json::json!({ "airlines": airlines }))?);
    }

    let mut out = format!("{:<10} {:<12} {}\n", "ID", "Airline", "Code");
    out.push_str(&"-".repeat(28));
    out.push('\n');
    for airline in Airline::ALL {
        out.push_str(&format!("{:<10} {:<12} {}\n", airline.id(), airline.label(), airline.code()));
    }
    Ok(out)
}

/// Fill and submit the form once, waiting for the backend if the form is accepted
pub async fn generate(
    service: Arc<dyn BoardingPassService>,
    timeout: Duration,
    airline: &str,
    pnr: &str,
    last_name: &str,
) -> Result<ResultState> {
    let mut controller = FormController::new(service, timeout);
    controller.on_field_change(FieldName::Airline, airline);
    controller.on_field_change(FieldName::Pnr, pnr);
    controller.on_field_change(FieldName::LastName, last_name);

    if controller.on_submit() == Phase::Pending {
        controller.resolve_next().await;
    }

    controller
        .result()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Submission finished without a result"))
}

/// Render a submission result for the terminal
pub fn format_result(result: &ResultState, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(result)?);
    }

    let heading = if result.success { "Success!" } else { "Error" };
    let mut out = format!("{} {}\n", heading, result.message);

    if let Some(ref pass) = result.boarding_pass {
        out.push('\n');
        out.push_str(&format!("Passenger:     {}\n", pass.passenger_name));
        out.push_str(&format!("Flight:        {}\n", pass.flight_number));
        out.push_str(&format!("From:          {}\n", pass.departure));
        out.push_str(&format!("To:            {}\n", pass.arrival));
        out.push_str(&format!("Date:          {}\n", pass.date.format("%Y-%m-%d")));
        out.push_str(&format!("Seat:          {}\n", pass.seat));
        out.push_str(&format!("Gate:          {}\n", pass.gate));
        out.push_str(&format!("Boarding Time: {}\n", pass.boarding_time));
        out.push_str(&format!("PNR:           {}\n", pass.pnr));
        if let Some(ref booking) = pass.booking_reference {
            out.push_str(&format!("Booking Ref:   {}\n", booking));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SUCCESS_MESSAGE;
    use crate::service::SimulatedService;

    fn service() -> Arc<dyn BoardingPassService> {
        Arc::new(SimulatedService::new(Duration::from_millis(2000)).with_seed(9))
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "boardpass", "generate", "-a", "akasa", "-p", "qp1234", "-n", "gupta", "--json",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Generate { airline, pnr, last_name, json }) => {
                assert_eq!(airline, "akasa");
                assert_eq!(pnr, "qp1234");
                assert_eq!(last_name, "gupta");
                assert!(json);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_defaults_to_tui() {
        let cli = Cli::try_parse_from(["boardpass"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_airline_listing() {
        let table = format_airlines(false).unwrap();
        assert!(table.contains("airindia"));
        assert!(table.contains("Akasa Air"));

        let json: serde_json::Value = serde_json::from_str(&format_airlines(true).unwrap()).unwrap();
        let airlines = json["airlines"].as_array().unwrap();
        assert_eq!(airlines.len(), 4);
        assert_eq!(airlines[0]["value"], "indigo");
        assert_eq!(airlines[0]["label"], "IndiGo");
        assert_eq!(airlines[3]["accent"]["from"], "purple");
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_success() {
        let result = generate(service(), Duration::from_secs(30), "indigo", "abc123", "verma")
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.message, SUCCESS_MESSAGE);
        let pass = result.boarding_pass.as_ref().unwrap();
        assert_eq!(pass.pnr, "ABC123");
        assert_eq!(pass.passenger_name, "VERMA");

        let text = format_result(&result, false).unwrap();
        assert!(text.starts_with("Success! Boarding pass generated successfully!"));
        assert!(text.contains("PNR:           ABC123"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_rejects_short_pnr() {
        let result = generate(service(), Duration::from_secs(30), "indigo", "abc", "verma")
            .await
            .unwrap();

        assert_eq!(result, ResultState::failure("PNR must be exactly 6 characters"));
        assert_eq!(
            format_result(&result, false).unwrap(),
            "Error PNR must be exactly 6 characters\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_json_output() {
        let result = generate(service(), Duration::from_secs(30), "", "abc123", "verma")
            .await
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&format_result(&result, true).unwrap()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Please fill in all required fields");
    }
}
