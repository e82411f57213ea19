use std::fs;

use haggis_core::parser::{LogFormat, LogInput, LogParser};
use haggis_core::result::{Error, Result};
use haggis_core::stats::Stats;
use haggis_core::{hands, transport};

mod report;

const INVALID_COMMAND_ERROR: &str = "Invalid command. See README for usage.";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<_> = std::env::args().collect();
    match args.get(1).map(|arg| arg.as_str()) {
        Some("stats") => stats(&args[2..]),
        Some("encode") => encode(&args[2..]),
        Some("decode") => decode(&args[2..]),
        _ => Err(Error::Input(INVALID_COMMAND_ERROR.to_string())),
    }
}

fn read_log(args: &[String]) -> Result<LogInput> {
    let [path] = args else {
        return Err(Error::Input(INVALID_COMMAND_ERROR.to_string()));
    };
    let content =
        fs::read_to_string(path).map_err(|err| Error::Input(format!("read {path}: {err}")))?;
    serde_json::from_str(&content).map_err(|err| Error::Input(format!("parse {path}: {err}")))
}

fn parse_log(input: &LogInput) -> Result<haggis_core::game::Game> {
    let format = LogFormat::detect(&input.lines);
    log::debug!("detected {format:?} log with {} lines", input.lines.len());
    LogParser::new().parse(format, &input.table_id, &input.players, &input.lines)
}

fn stats(args: &[String]) -> Result<()> {
    let input = read_log(args)?;
    let game = parse_log(&input)?;
    let stats = Stats::of(&game);
    let hands = hands::build(&game);
    print!("{}", report::render(&game, &stats, &hands));
    Ok(())
}

fn encode(args: &[String]) -> Result<()> {
    let input = read_log(args)?;
    let game = parse_log(&input)?;
    println!("{}", transport::encode(&game)?);
    Ok(())
}

fn decode(args: &[String]) -> Result<()> {
    let [data] = args else {
        return Err(Error::Input(INVALID_COMMAND_ERROR.to_string()));
    };
    match transport::decode::<serde_json::Value>(data) {
        Ok(value) => {
            let pretty = serde_json::to_string_pretty(&value)
                .map_err(|err| Error::Decode(err.to_string()))?;
            println!("{pretty}");
        }
        Err(err) => {
            // The user-facing fallback; the decode failure itself only
            // reaches the log.
            log::error!("{err}");
            println!("Data not found");
        }
    }
    Ok(())
}
