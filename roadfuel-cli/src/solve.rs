//! Solve command implementation for the roadfuel CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roadfuel_core::{
    CachedDistanceProvider, DEFAULT_RESOLUTION_KM, HaversineDistanceSource, MemoryDistanceCache,
    MemoryStationStore, PlanResponse, Planner, Station, StraightLinePathProvider, TripRequest,
};
use roadfuel_fs::open_utf8_file;
use roadfuel_solver_lp::{LpPlanner, PlannerConfig};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::io::{BufReader, Write};
use std::time::Duration;

use crate::{
    ARG_SOLVE_MAX_CANDIDATES, ARG_SOLVE_REQUEST, ARG_SOLVE_RESOLUTION, ARG_SOLVE_STATIONS,
    ARG_SOLVE_TIME_LIMIT, CliError, ENV_SOLVE_REQUEST, ENV_SOLVE_STATIONS,
};

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan the cheapest refuelling stops for a trip. The trip is \
                 a JSON-encoded TripRequest and the stations are a JSON \
                 array of Station records. Paths run straight between the \
                 endpoints and road distances are great-circle distances.",
    about = "Plan refuelling stops for a trip"
)]
#[ortho_config(prefix = "ROADFUEL")]
pub(crate) struct SolveArgs {
    /// Path to a JSON file containing a TripRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Path to a JSON file containing the station dataset.
    #[arg(long = ARG_SOLVE_STATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) stations: Option<Utf8PathBuf>,
    /// Largest spacing between consecutive path points, in kilometres.
    #[arg(long = ARG_SOLVE_RESOLUTION, value_name = "km")]
    #[serde(default)]
    pub(crate) resolution_km: Option<f64>,
    /// Abort when more candidate stations than this survive selection.
    #[arg(long = ARG_SOLVE_MAX_CANDIDATES, value_name = "count")]
    #[serde(default)]
    pub(crate) max_candidates: Option<usize>,
    /// Wall-clock budget for pricing stop combinations, in seconds.
    #[arg(long = ARG_SOLVE_TIME_LIMIT, value_name = "secs")]
    #[serde(default)]
    pub(crate) time_limit_secs: Option<u64>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SolveConfig {
    /// Path to the JSON trip request.
    pub(crate) request_path: Utf8PathBuf,
    /// Path to the JSON station dataset.
    pub(crate) stations_path: Utf8PathBuf,
    /// Spacing of the straight-line path.
    pub(crate) resolution_km: f64,
    /// Candidate limit handed to the planner.
    pub(crate) max_candidates: usize,
    /// Sweep budget handed to the planner.
    pub(crate) sweep_time_limit: Option<Duration>,
}

impl SolveConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.request_path, ARG_SOLVE_REQUEST)?;
        Self::require_existing(&self.stations_path, ARG_SOLVE_STATIONS)?;
        Ok(())
    }

    pub(crate) fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            max_candidates: self.max_candidates,
            sweep_time_limit: self.sweep_time_limit,
            ..PlannerConfig::default()
        }
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match roadfuel_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_SOLVE_REQUEST,
            env: ENV_SOLVE_REQUEST,
        })?;
        let stations_path = args.stations.ok_or(CliError::MissingArgument {
            field: ARG_SOLVE_STATIONS,
            env: ENV_SOLVE_STATIONS,
        })?;

        let resolution_km = args.resolution_km.unwrap_or(DEFAULT_RESOLUTION_KM);
        if !resolution_km.is_finite() || resolution_km <= 0.0 {
            return Err(CliError::InvalidResolution {
                field: ARG_SOLVE_RESOLUTION,
                value: resolution_km,
            });
        }
        let max_candidates = args
            .max_candidates
            .unwrap_or_else(|| PlannerConfig::default().max_candidates);

        Ok(Self {
            request_path,
            stations_path,
            resolution_km,
            max_candidates,
            sweep_time_limit: args.time_limit_secs.map(Duration::from_secs),
        })
    }
}

/// Builds a planner for the current solve invocation.
pub(super) trait SolvePlannerBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Box<dyn Planner>, CliError>;
}

/// Plans against the station file with straight-line paths and haversine distances.
pub(super) struct DefaultSolvePlannerBuilder;

impl SolvePlannerBuilder for DefaultSolvePlannerBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Box<dyn Planner>, CliError> {
        let stations = load_stations(&config.stations_path)?;
        let store = MemoryStationStore::with_stations(stations);
        log::info!(
            "loaded {} stations from {}",
            store.len(),
            config.stations_path
        );
        let distances = CachedDistanceProvider::new(
            MemoryDistanceCache::default(),
            store.clone(),
            HaversineDistanceSource,
        );
        Ok(Box::new(LpPlanner::with_config(
            StraightLinePathProvider::with_resolution(config.resolution_km),
            store,
            distances,
            config.planner_config(),
        )))
    }
}

pub(super) fn run_solve(args: SolveArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultSolvePlannerBuilder;
    run_solve_with(args, &builder, &mut stdout)
}

pub(super) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn SolvePlannerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let response = execute_solve(args, builder)?;
    write_plan_response(writer, &response)
}

fn execute_solve(
    args: SolveArgs,
    builder: &dyn SolvePlannerBuilder,
) -> Result<PlanResponse, CliError> {
    let config = resolve_solve_config(args)?;
    let request = load_trip_request(&config.request_path)?;
    request
        .validate()
        .map_err(|source| CliError::InvalidTripRequest {
            path: config.request_path.clone(),
            source,
        })?;
    let planner = builder.build(&config)?;
    planner
        .solve(&request)
        .map_err(|source| CliError::Plan { source })
}

fn resolve_solve_config(args: SolveArgs) -> Result<SolveConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Loads a JSON-encoded [`TripRequest`] from disk.
pub(super) fn load_trip_request(path: &Utf8Path) -> Result<TripRequest, CliError> {
    read_json(path).map_err(|err| match err {
        JsonReadError::Open(source) => CliError::OpenTripRequest {
            path: path.to_path_buf(),
            source,
        },
        JsonReadError::Parse(source) => CliError::ParseTripRequest {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Loads a JSON array of [`Station`] records from disk.
pub(super) fn load_stations(path: &Utf8Path) -> Result<Vec<Station>, CliError> {
    read_json(path).map_err(|err| match err {
        JsonReadError::Open(source) => CliError::OpenStations {
            path: path.to_path_buf(),
            source,
        },
        JsonReadError::Parse(source) => CliError::ParseStations {
            path: path.to_path_buf(),
            source,
        },
    })
}

enum JsonReadError {
    Open(std::io::Error),
    Parse(serde_json::Error),
}

fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, JsonReadError> {
    let file = open_utf8_file(path).map_err(JsonReadError::Open)?;
    serde_json::from_reader(BufReader::new(file)).map_err(JsonReadError::Parse)
}

fn write_plan_response(writer: &mut dyn Write, response: &PlanResponse) -> Result<(), CliError> {
    let payload =
        serde_json::to_string_pretty(response).map_err(CliError::SerializePlanResponse)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WritePlanOutput)?;
    writer
        .write_all(b"\n")
        .map_err(CliError::WritePlanOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
