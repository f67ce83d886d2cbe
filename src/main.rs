use std::path::PathBuf;
use std::time::Instant;

use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::{Builder, Env};
use log::{debug, info, LevelFilter};
use sysinfo::{ProcessExt, System, SystemExt};

use heart_risk::bundle;
use heart_risk::cleaning;
use heart_risk::input::PatientInput;
use heart_risk::io::{self, WriteFormat};
use heart_risk::pipeline;
use heart_risk::{HeartRiskError, TrainConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Heart-disease risk prediction", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[arg(short, long, action = ArgAction::Count, global = true, help = "Verbose level")]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the shape, first rows and missing values of a dataset
    Inspect {
        #[arg(short, long, help = "Input CSV path")]
        input: PathBuf,
        #[arg(short, long, default_value_t = 5, help = "Number of rows to show")]
        rows: usize,
    },

    /// Remove duplicates and write the cleaned and standardized datasets
    Preprocess {
        #[arg(short, long, help = "Input CSV path")]
        input: PathBuf,
        #[arg(long, default_value = "heart_cleaned.csv")]
        cleaned: PathBuf,
        #[arg(long, default_value = "heart_scaled.csv")]
        scaled: PathBuf,
        #[arg(short, long, value_enum, default_value_t = WriteFormat::Csv, help = "Output format")]
        format: WriteFormat,
        #[arg(long, help = "Keep missing values instead of imputing the median")]
        no_impute: bool,
    },

    /// Fit scaler, selector and classifier and write the model bundle
    Train {
        #[arg(short, long, help = "Input CSV path")]
        input: PathBuf,
        #[arg(short, long, default_value = "model.json")]
        bundle: PathBuf,
        #[arg(short, long, default_value_t = 10, help = "Number of features to keep")]
        k: usize,
        #[arg(long, default_value_t = 0.2)]
        test_size: f64,
        #[arg(long, default_value_t = 123)]
        seed: u64,
        #[arg(long, help = "Keep missing values instead of imputing the median")]
        no_impute: bool,
    },

    /// Predict heart-disease risk for one patient
    Predict {
        #[arg(short, long, default_value = "model.json")]
        bundle: PathBuf,
        #[command(flatten)]
        patient: PatientArgs,
    },
}

#[derive(Args, Debug)]
struct PatientArgs {
    #[arg(long, help = "Age in years (0-120)")]
    age: Option<f64>,
    #[arg(long, help = "Sex: 1 male, 0 female")]
    sex: Option<f64>,
    #[arg(long, help = "Chest pain type (0-3)")]
    cp: Option<f64>,
    #[arg(long, help = "Resting blood pressure in mm Hg (50-200)")]
    trestbps: Option<f64>,
    #[arg(long, help = "Serum cholesterol in mg/dL (100-600)")]
    chol: Option<f64>,
    #[arg(long, help = "Fasting blood sugar > 120 mg/dL: 1 yes, 0 no")]
    fbs: Option<f64>,
    #[arg(long, help = "Resting electrocardiographic result (0-2)")]
    restecg: Option<f64>,
    #[arg(long, help = "Maximum heart rate (50-220)")]
    thalach: Option<f64>,
    #[arg(long, help = "Exercise induced angina: 1 yes, 0 no")]
    exang: Option<f64>,
    #[arg(long, help = "ST depression in mm (0-10)")]
    oldpeak: Option<f64>,
    #[arg(long, help = "Slope of the peak exercise ST segment (0-2)")]
    slope: Option<f64>,
    #[arg(long, help = "Major vessels colored by fluoroscopy (0-4)")]
    ca: Option<f64>,
    #[arg(long, help = "Thalassemia (0-3)")]
    thal: Option<f64>,
}

impl From<PatientArgs> for PatientInput {
    fn from(args: PatientArgs) -> Self {
        PatientInput {
            age: args.age,
            sex: args.sex,
            cp: args.cp,
            trestbps: args.trestbps,
            chol: args.chol,
            fbs: args.fbs,
            restecg: args.restecg,
            thalach: args.thalach,
            exang: args.exang,
            oldpeak: args.oldpeak,
            slope: args.slope,
            ca: args.ca,
            thal: args.thal,
        }
    }
}

fn resident_memory() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut sys = System::new();
    sys.refresh_process(pid);
    sys.process(pid).map(|process| process.memory())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), HeartRiskError> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let env = Env::new().filter("HEART_LOG");
    Builder::new()
        .filter(Some("heart_risk"), log_level)
        .parse_env(env)
        .init();

    debug!("Arguments {:#?}", cli);

    run(cli.command).await
}

async fn run(command: Command) -> Result<(), HeartRiskError> {
    match command {
        Command::Inspect { input, rows } => {
            let df = io::read_csv(&input)?;
            println!("shape (rows, columns): {:?}", df.shape());
            println!("{}", df.head(Some(rows)));
            for series in df.get_columns() {
                let missing = series.null_count();
                if missing > 0 {
                    println!("missing values in {}: {}", series.name(), missing);
                }
            }
            if cleaning::missing_count(&df) == 0 {
                println!("no missing values");
            }
        }

        Command::Preprocess {
            input,
            cleaned,
            scaled,
            format,
            no_impute,
        } => {
            let raw = io::read_csv(&input)?;
            let mut result = pipeline::preprocess(raw, !no_impute)?;
            io::write_dataset(&cleaned, &mut result.cleaned, format)?;
            io::write_dataset(&scaled, &mut result.scaled, format)?;
            info!(
                "preprocessing results written to {} and {}",
                cleaned.display(),
                scaled.display()
            );
        }

        Command::Train {
            input,
            bundle: bundle_path,
            k,
            test_size,
            seed,
            no_impute,
        } => {
            let start_time = Instant::now();
            let start_memory = resident_memory();

            let config = TrainConfig {
                k,
                test_size,
                seed,
                impute: !no_impute,
                ..TrainConfig::default()
            };
            let raw = io::read_csv(&input)?;
            let outcome = pipeline::train(raw, &config)?;
            bundle::save(&bundle_path, &outcome.bundle).await?;

            println!(
                "accuracy: {:.2}% on {} test rows",
                outcome.report.accuracy * 100.0,
                outcome.report.n_test
            );

            debug!("training took {:?}", start_time.elapsed());
            if let (Some(before), Some(after)) = (start_memory, resident_memory()) {
                debug!("resident memory grew by {} bytes", after.saturating_sub(before));
            }
        }

        Command::Predict {
            bundle: bundle_path,
            patient,
        } => {
            let model = bundle::load(&bundle_path).await?;
            let record = PatientInput::from(patient).validate()?;
            let prediction = model.predict(&record)?;

            let verdict = if prediction.label == bundle::POSITIVE_LABEL {
                "heart disease diagnosed"
            } else {
                "no heart disease"
            };
            println!("prediction: {verdict}");
            println!(
                "probability: {:.2}% chance of heart disease",
                prediction.probability * 100.0
            );
        }
    }

    Ok(())
}
