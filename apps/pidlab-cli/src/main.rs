use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use pidlab_control::{OutputLimits, PidController};
use pidlab_plant::{Plant, PlantConfig, SystemType};
use pidlab_sim::{
    ResponseMetrics, SimOptions, SimulationRun, preset_scenarios, run_closed_loop, run_comparison,
};

#[derive(Parser)]
#[command(name = "pidlab-cli")]
#[command(about = "pidlab CLI - closed-loop PID simulation sandbox", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one closed-loop simulation and print response metrics
    Run {
        #[command(flatten)]
        plant: PlantArgs,
        /// Proportional gain
        #[arg(long, default_value_t = 1.0)]
        kp: f64,
        /// Integral gain
        #[arg(long, default_value_t = 0.1)]
        ki: f64,
        /// Derivative gain
        #[arg(long, default_value_t = 0.05)]
        kd: f64,
        /// Target setpoint
        #[arg(long, default_value_t = 10.0)]
        setpoint: f64,
        /// Time step in seconds
        #[arg(long, default_value_t = 0.01)]
        dt: f64,
        /// Simulation time in seconds
        #[arg(long, default_value_t = 20.0)]
        duration: f64,
        /// Use a named preset tuning (overrides gains/setpoint/duration)
        #[arg(long)]
        preset: Option<String>,
        /// Lower controller output limit (requires --limit-max)
        #[arg(long, requires = "limit_max")]
        limit_min: Option<f64>,
        /// Upper controller output limit (requires --limit-min)
        #[arg(long, requires = "limit_min")]
        limit_max: Option<f64>,
        /// Write the full run as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write time,setpoint,output,control,error rows to this path
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Run the preset tuning table against one plant and tabulate metrics
    Compare {
        #[command(flatten)]
        plant: PlantArgs,
        /// Time step in seconds
        #[arg(long, default_value_t = 0.01)]
        dt: f64,
    },
    /// Print the plant's transfer function
    Describe {
        #[command(flatten)]
        plant: PlantArgs,
    },
}

/// Plant selection shared by all subcommands.
#[derive(Args)]
struct PlantArgs {
    /// Plant type: first_order, second_order or integrator
    #[arg(long, default_value = "second_order")]
    plant: String,
    /// Time constant τ (first_order)
    #[arg(long, default_value_t = 1.0)]
    time_constant: f64,
    /// Damping ratio ζ (second_order)
    #[arg(long, default_value_t = 0.5)]
    damping: f64,
    /// Natural frequency ωn in rad/s (second_order)
    #[arg(long, default_value_t = 1.0)]
    natural_freq: f64,
    /// Static gain K (all plants)
    #[arg(long, default_value_t = 1.0)]
    gain: f64,
}

impl PlantArgs {
    fn to_config(&self) -> Result<PlantConfig, Box<dyn Error>> {
        let system_type: SystemType = self.plant.parse()?;
        Ok(match system_type {
            SystemType::FirstOrder => PlantConfig::FirstOrder {
                time_constant: self.time_constant,
                gain: self.gain,
            },
            SystemType::SecondOrder => PlantConfig::SecondOrder {
                damping: self.damping,
                natural_freq: self.natural_freq,
                gain: self.gain,
            },
            SystemType::Integrator => PlantConfig::Integrator { gain: self.gain },
        })
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            plant,
            kp,
            ki,
            kd,
            setpoint,
            dt,
            duration,
            preset,
            limit_min,
            limit_max,
            json,
            csv,
        } => cmd_run(
            &plant,
            kp,
            ki,
            kd,
            setpoint,
            dt,
            duration,
            preset.as_deref(),
            limit_min.zip(limit_max),
            json.as_deref(),
            csv.as_deref(),
        ),
        Commands::Compare { plant, dt } => cmd_compare(&plant, dt),
        Commands::Describe { plant } => cmd_describe(&plant),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    plant_args: &PlantArgs,
    kp: f64,
    ki: f64,
    kd: f64,
    setpoint: f64,
    dt: f64,
    duration: f64,
    preset: Option<&str>,
    limits: Option<(f64, f64)>,
    json: Option<&Path>,
    csv: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let (kp, ki, kd, setpoint, duration) = match preset {
        Some(name) => {
            let scenario = preset_scenarios()
                .into_iter()
                .find(|s| s.label.eq_ignore_ascii_case(name))
                .ok_or_else(|| format!("unknown preset: {name}"))?;
            (
                scenario.kp,
                scenario.ki,
                scenario.kd,
                scenario.setpoint,
                scenario.duration,
            )
        }
        None => (kp, ki, kd, setpoint, duration),
    };

    let config = plant_args.to_config()?;
    let mut pid = PidController::new(kp, ki, kd);
    if let Some((min, max)) = limits {
        pid = pid.with_output_limits(OutputLimits::new(min, max));
    }
    let mut plant = Plant::from_config(&config)?;

    let opts = SimOptions { dt, duration };
    let run = run_closed_loop(&mut pid, &mut plant, setpoint, &opts)?;
    let metrics = ResponseMetrics::from_run(&run);

    println!(
        "Plant: {} | Kp={kp} Ki={ki} Kd={kd} | setpoint={setpoint} dt={dt} duration={duration}s",
        config.system_type()
    );
    println!("  Steady-state error: {:.4}", metrics.steady_state_error);
    println!("  Overshoot:          {:.1}%", metrics.overshoot_pct);
    println!("  Settling time:      {:.2}s", metrics.settling_time_s);

    if let Some(path) = json {
        fs::write(path, serde_json::to_string_pretty(&run)?)?;
        println!("✓ Run written to {}", path.display());
    }
    if let Some(path) = csv {
        fs::write(path, run_to_csv(&run))?;
        println!("✓ Series written to {}", path.display());
    }

    Ok(())
}

fn cmd_compare(plant_args: &PlantArgs, dt: f64) -> Result<(), Box<dyn Error>> {
    let config = plant_args.to_config()?;
    let results = run_comparison(&preset_scenarios(), &config, dt)?;

    println!("Preset comparison on {} plant:", config.system_type());
    println!(
        "  {:<14} {:>8} {:>12} {:>14}",
        "preset", "ss error", "overshoot %", "settling (s)"
    );
    for result in &results {
        println!(
            "  {:<14} {:>8.4} {:>12.1} {:>14.2}",
            result.scenario.label,
            result.metrics.steady_state_error,
            result.metrics.overshoot_pct,
            result.metrics.settling_time_s
        );
    }
    Ok(())
}

fn cmd_describe(plant_args: &PlantArgs) -> Result<(), Box<dyn Error>> {
    let config = plant_args.to_config()?;
    let plant = Plant::from_config(&config)?;
    let tf = plant.transfer_function();

    println!("{} plant", config.system_type());
    println!("  {}", tf.description);
    println!("  numerator:   {:?}", tf.numerator);
    println!("  denominator: {:?}", tf.denominator);
    Ok(())
}

fn run_to_csv(run: &SimulationRun) -> String {
    let mut out = String::from("time,setpoint,output,control,error\n");
    for i in 0..run.len() {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            run.time[i], run.setpoint, run.output[i], run.control_signal[i], run.error[i]
        ));
    }
    out
}
