use clap::{App, Arg};
use rowsample::arrayio;
use rowsample::data::DType;
use rowsample::json_api::{do_sample, SampleRequest};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let matches = App::new("subsample")
        .version("0.1")
        .about("Reduce a dense array file by keeping a sample of its rows.")
        .arg(Arg::with_name("INPUT").required(true))
        .arg(Arg::with_name("OUTPUT").required(true))
        .arg(
            Arg::with_name("dims")
                .long("dims")
                .takes_value(true)
                .required(true)
                .help("Comma-separated dimension sizes, outermost last, e.g. 3,4,20"),
        )
        .arg(Arg::with_name("dtype").long("dtype").takes_value(true))
        .arg(
            Arg::with_name("mode")
                .long("mode")
                .short("m")
                .takes_value(true),
        )
        .arg(Arg::with_name("seed").long("seed").takes_value(true))
        .arg(
            Arg::with_name("rate")
                .long("rate")
                .short("r")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("text")
                .long("text")
                .help("Parse the input as whitespace-separated numerals"),
        )
        .get_matches();

    let mut request = SampleRequest::default();
    if let Some(mode) = matches.value_of("mode") {
        request.mode = mode.to_string();
    }
    if let Some(seed) = matches.value_of("seed") {
        request.seed = seed.parse::<u64>()?;
    }
    if let Some(rate) = matches.value_of("rate") {
        request.rate = rate.parse::<f64>()?;
    }

    let dtype = match matches.value_of("dtype") {
        Some(name) => DType::parse(name).ok_or_else(|| format!("No such dtype={}", name))?,
        None => DType::F32,
    };
    let dims = parse_dims(
        matches
            .value_of("dims")
            .ok_or("You need --dims to describe the input!")?,
    )?;

    let input_path = matches
        .value_of("INPUT")
        .ok_or("You need an input file to sample!")?;
    let output_path = matches.value_of("OUTPUT").ok_or("You need an output path!")?;

    let input = if matches.is_present("text") {
        arrayio::load_text(input_path, dtype, &dims)?
    } else {
        arrayio::load_raw(input_path, dtype, &dims)?
    };

    let output = do_sample(&request, &input)?;
    arrayio::save_raw(&output, output_path)?;

    println!("{}: {} dims {:?}", input_path, dtype, input.dims());
    println!(
        "  mode={} seed={} rate={}",
        request.mode, request.seed, request.rate
    );
    println!(
        "  kept {} of {} rows -> {} dims {:?}",
        output.num_rows(),
        input.num_rows(),
        output_path,
        output.dims()
    );
    Ok(())
}

fn parse_dims(text: &str) -> Result<Vec<usize>, Box<dyn Error>> {
    let mut dims = Vec::new();
    for tok in text.split(',') {
        dims.push(
            tok.trim()
                .parse::<usize>()
                .map_err(|_| format!("Bad dimension: {}", tok))?,
        );
    }
    Ok(dims)
}
