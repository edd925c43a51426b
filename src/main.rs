use std::{
    env,
    fs::{read_to_string, File},
    io::{BufWriter, Error, ErrorKind, Result},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use toml::{from_str, Value};
use tdmi_analysis::{
    connectivity::{ConnectivityMatrix, NeuronType},
    error::TdmiAnalysisError,
    features::write_profile_with_baseline,
    fitting::{fit_decay, DecayModel, FittingSettings},
    pipeline::{analyze_network, analyze_network_parallel, AnalysisParameters},
    series::TimeSeries,
    surrogate::SurrogateGenerator,
    synthetic::{coupled_pair, CoupledPairParameters},
    tdmi::{scan, LagRange, ScanSettings},
};


fn parse_bool(value: &Value, field_name: &str) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, format!("Cannot parse {} as boolean", field_name)))
}

fn parse_usize(value: &Value, field_name: &str) -> Result<usize> {
    value
        .as_integer()
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, format!("Cannot parse {} as unsigned integer", field_name)))
        .map(|v| v as usize)
}

fn parse_f64(value: &Value, field_name: &str) -> Result<f64> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|v| v as f64))
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, format!("Cannot parse {} as float", field_name)))
}

fn parse_value_with_default<T>(
    table: &Value,
    key: &str,
    parser: impl Fn(&Value, &str) -> Result<T>,
    default: T,
) -> Result<T> {
    table
        .get(key)
        .map_or(Ok(default), |value| parser(value, key))
}

fn convert_error(error: TdmiAnalysisError) -> Error {
    Error::new(ErrorKind::Other, format!("{}", error))
}

struct PairParameters {
    pair: CoupledPairParameters,
    lag_range: LagRange,
    scan_settings: ScanSettings,
    surrogate_draws: usize,
    seed: Option<u64>,
    fitting: FittingSettings,
}

fn get_pair_parameters(table: &Value) -> Result<PairParameters> {
    let length = parse_value_with_default(table, "length", parse_usize, 10_000)?;
    println!("length: {}", length);

    let delay = parse_value_with_default(table, "delay", parse_usize, 8)?;
    println!("delay: {}", delay);

    let coupling = parse_value_with_default(table, "coupling", parse_f64, 0.8)?;
    println!("coupling: {}", coupling);

    let noise_std = parse_value_with_default(table, "noise_std", parse_f64, 1.)?;
    println!("noise_std: {}", noise_std);

    let ar_coefficient = parse_value_with_default(table, "ar_coefficient", parse_f64, 0.5)?;
    println!("ar_coefficient: {}", ar_coefficient);

    let dt = parse_value_with_default(table, "dt", parse_f64, 1.)?;
    println!("dt: {}", dt);

    let negative_time_delay = parse_value_with_default(table, "negative_time_delay", parse_f64, 20.)?;
    let positive_time_delay = parse_value_with_default(table, "positive_time_delay", parse_f64, 20.)?;
    let timing_step = parse_value_with_default(table, "timing_step", parse_f64, 1.)?;
    println!(
        "time-delay: [-{:.2}, {:.2}] ms, step: {:.2} ms",
        negative_time_delay, positive_time_delay, timing_step,
    );

    let expected_occupancy = parse_value_with_default(table, "expected_occupancy", parse_f64, 50.)?;
    println!("expected_occupancy: {}", expected_occupancy);

    let surrogate_draws = parse_value_with_default(table, "surrogate_draws", parse_usize, 1)?;
    println!("surrogate_draws: {}", surrogate_draws);

    let seed = match table.get("seed") {
        Some(value) => Some(parse_usize(value, "seed")? as u64),
        None => None,
    };

    let symmetric = parse_value_with_default(table, "symmetric_decay", parse_bool, false)?;

    let lag_range = LagRange::new(negative_time_delay, positive_time_delay, timing_step)
        .map_err(|e| convert_error(e.into()))?;

    let scan_settings = ScanSettings {
        expected_occupancy,
        ..ScanSettings::default()
    };

    let fitting = FittingSettings {
        model: if symmetric { DecayModel::Symmetric } else { DecayModel::Asymmetric },
        ..FittingSettings::default()
    };

    Ok(PairParameters {
        pair: CoupledPairParameters { length, delay, coupling, noise_std, ar_coefficient, dt },
        lag_range,
        scan_settings,
        surrogate_draws,
        seed,
        fitting,
    })
}

fn run_pair_analysis(table: &Value) -> Result<()> {
    let tag: &str = match table.get("tag") {
        Some(value) => {
            match value.as_str() {
                Some(str_value) => str_value,
                None => { return Err(Error::new(ErrorKind::InvalidInput, "Cannot parse 'tag'")) },
            }
        },
        None => { return Err(Error::new(ErrorKind::InvalidInput, "Cannot parse 'tag'")) },
    };
    println!("tag: {}", tag);

    let params = get_pair_parameters(table)?;

    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (x, y) = coupled_pair(&params.pair, &mut rng)
        .map_err(|e| convert_error(e.into()))?;

    println!(">> Calculating ordered TDMI ...");
    let profile = scan(&x, &y, &params.lag_range, &params.scan_settings)
        .map_err(convert_error)?;

    println!(">> Calculating swapped TDMI ...");
    let mut surrogate = match params.seed {
        Some(seed) => SurrogateGenerator::with_seed(params.surrogate_draws, seed),
        None => SurrogateGenerator::new(params.surrogate_draws),
    };
    let null_profile = surrogate.null_profile(&x, &y, &params.lag_range, &params.scan_settings)
        .map_err(convert_error)?;

    println!(">> Outputing data ...");
    let mut file = BufWriter::new(File::create(format!("{}_profile.csv", tag))?);
    write_profile_with_baseline(&mut file, &profile, &null_profile)?;

    let corrected = profile.subtract(&null_profile)
        .map_err(|e| convert_error(e.into()))?;

    match fit_decay(&corrected, &params.fitting) {
        Ok(fit) => {
            println!(
                "peak_lag: {:.4}, amplitude: {:.4}, snr: {:.4}, tau: {:.4}, residual: {:.4}",
                fit.peak_lag, fit.peak_amplitude, fit.signal_noise_ratio,
                fit.time_constant, fit.fit_residual,
            );
        },
        Err(error) => println!("Fit failed: {}", error),
    }

    println!("Finished pair analysis");

    Ok(())
}

fn run_network_analysis(table: &Value) -> Result<()> {
    let tag: &str = match table.get("tag") {
        Some(value) => {
            match value.as_str() {
                Some(str_value) => str_value,
                None => { return Err(Error::new(ErrorKind::InvalidInput, "Cannot parse 'tag'")) },
            }
        },
        None => { return Err(Error::new(ErrorKind::InvalidInput, "Cannot parse 'tag'")) },
    };
    println!("tag: {}", tag);

    let num_neurons = parse_value_with_default(table, "num_neurons", parse_usize, 100)?;
    println!("num_neurons: {}", num_neurons);

    let excitatory_chance = parse_value_with_default(table, "excitatory_chance", parse_f64, 0.8)?;
    println!("excitatory_chance: {}", excitatory_chance);

    let connection_chance = parse_value_with_default(table, "connection_chance", parse_f64, 0.1)?;
    println!("connection_chance: {}", connection_chance);

    let parallel = parse_value_with_default(table, "parallel", parse_bool, false)?;
    println!("parallel: {}", parallel);

    let network_seed = parse_value_with_default(table, "seed", parse_usize, 0)? as u64;
    println!("seed: {}", network_seed);

    let pair_params = get_pair_parameters(table)?;

    let mut rng = StdRng::seed_from_u64(network_seed);

    let rows: Vec<Vec<u8>> = (0..num_neurons)
        .map(|i| {
            (0..num_neurons)
                .map(|j| u8::from(i != j && rng.gen::<f64>() < connection_chance))
                .collect()
        })
        .collect();
    let connectivity = ConnectivityMatrix::from_rows(rows)
        .map_err(|e| convert_error(e.into()))?;

    let types: Vec<NeuronType> = (0..num_neurons)
        .map(|_| {
            if rng.gen::<f64>() < excitatory_chance {
                NeuronType::Excitatory
            } else {
                NeuronType::Inhibitory
            }
        })
        .collect();

    let mut analysis_params = AnalysisParameters::new(pair_params.lag_range);
    analysis_params.scan = pair_params.scan_settings;
    analysis_params.surrogate_draws = pair_params.surrogate_draws;
    analysis_params.surrogate_seed = Some(network_seed);
    analysis_params.fitting = pair_params.fitting;

    let generation = pair_params.pair;
    let source = move |index: usize| -> std::result::Result<(TimeSeries, TimeSeries), TdmiAnalysisError> {
        let mut unit_rng = StdRng::seed_from_u64(network_seed.wrapping_add(index as u64));

        Ok(coupled_pair(&generation, &mut unit_rng)?)
    };

    let targets: Vec<usize> = (0..num_neurons).collect();

    println!(">> Calculating TDMI features ...");
    let table_result = if parallel {
        analyze_network_parallel(source, &connectivity, &types, &targets, &analysis_params)
    } else {
        analyze_network(source, &connectivity, &types, &targets, &analysis_params)
    };
    let feature_table = table_result.map_err(convert_error)?;

    println!(">> Outputing data ...");
    feature_table.write_to_file(format!("{}_features.csv", tag))?;

    println!("Finished network analysis");

    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Requires .toml argument file");
        return Err(Error::new(ErrorKind::InvalidInput, "Requires .toml argument file"));
    }

    let toml_content = read_to_string(&args[1]).expect("Cannot read file");
    let config: Value = from_str(&toml_content).expect("Cannot read config");

    if let Some(pair_table) = config.get("pair_analysis") {
        run_pair_analysis(pair_table)?;
    } else if let Some(network_table) = config.get("network_analysis") {
        run_network_analysis(network_table)?;
    } else {
        return Err(Error::new(ErrorKind::InvalidInput, "Analysis config not found"));
    }

    Ok(())
}
