use dyntree::data::loader::read_csv;
use dyntree::experiment::{run_static, run_streaming, ExperimentParams};
use std::error::Error;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: dyntree <file.csv> [--height N] [--min-split-points N] [--beta X] \
[--train-fraction F] [--seed S] [--header] [--streaming]";

struct Args {
    file_path: String,
    has_headers: bool,
    streaming: bool,
    params: ExperimentParams,
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String, Box<dyn Error>> {
    args.next()
        .ok_or_else(|| format!("{} needs a value\n{}", flag, USAGE).into())
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let mut file_path = None;
    let mut has_headers = false;
    let mut streaming = false;
    let mut height = None;
    let mut min_split_points = None;
    let mut beta = None;
    let mut train_fraction = None;
    let mut seed = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--height" => height = Some(value(&mut args, &arg)?.parse::<usize>()?),
            "--min-split-points" => {
                min_split_points = Some(value(&mut args, &arg)?.parse::<usize>()?)
            }
            "--beta" => beta = Some(value(&mut args, &arg)?.parse::<f64>()?),
            "--train-fraction" => train_fraction = Some(value(&mut args, &arg)?.parse::<f64>()?),
            "--seed" => seed = Some(value(&mut args, &arg)?.parse::<u64>()?),
            "--header" => has_headers = true,
            "--streaming" => streaming = true,
            flag if flag.starts_with("--") => {
                return Err(format!("unknown option {}\n{}", flag, USAGE).into())
            }
            path => file_path = Some(path.to_string()),
        }
    }

    let mut params = if streaming {
        ExperimentParams::streaming()
    } else {
        ExperimentParams::new()
    };
    params.tree_params.set_max_height(height.unwrap_or(5))?;
    params.tree_params.set_min_split_points(min_split_points.unwrap_or(3))?;
    params.tree_params.set_beta(beta.unwrap_or(0.0))?;
    if let Some(train_fraction) = train_fraction {
        params.set_train_fraction(train_fraction)?;
    }
    params.shuffle_seed = seed;

    Ok(Args {
        file_path: file_path.ok_or(USAGE)?,
        has_headers,
        streaming,
        params,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args()?;
    let dataset = read_csv(&args.file_path, args.has_headers)?;
    println!("Loaded dataset with {} points", dataset.nrows());

    let report = if args.streaming {
        run_streaming(&dataset, &args.params)?
    } else {
        run_static(&dataset, &args.params)?
    };

    match report.f1 {
        Some(f1) => println!("f1 score : {}", f1),
        None => println!("f1 score : undefined"),
    }
    Ok(())
}
