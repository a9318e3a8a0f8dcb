//! beanstalk CLI Client
//!
//! Command-line interface for a beanstalkd server.

use std::io::Read;
use std::time::Duration;

use beanstalk::{Config, Conn, Job, Result, Stats};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// beanstalk CLI
#[derive(Parser, Debug)]
#[command(name = "beanstalk-cli")]
#[command(about = "CLI for the beanstalkd work queue")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:11300")]
    addr: String,

    /// Tube to use for put/peek/kick/stats-tube/pause
    #[arg(short, long, default_value = beanstalk::DEFAULT_TUBE)]
    tube: String,

    /// Connect timeout in milliseconds (0 = OS default)
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Put a job (body from the argument, or stdin if omitted)
    Put {
        body: Option<String>,

        #[arg(short, long, default_value = "1024")]
        pri: u32,

        /// Delay in seconds
        #[arg(short, long, default_value = "0")]
        delay: u64,

        /// Time-to-run in seconds
        #[arg(long, default_value = "60")]
        ttr: u64,
    },

    /// Reserve a job from the tube
    Reserve {
        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Delete a job
    Delete { id: u64 },

    /// Release a reserved job
    Release {
        id: u64,

        #[arg(short, long, default_value = "1024")]
        pri: u32,

        #[arg(short, long, default_value = "0")]
        delay: u64,
    },

    /// Bury a reserved job
    Bury {
        id: u64,

        #[arg(short, long, default_value = "1024")]
        pri: u32,
    },

    /// Extend a reserved job's time-to-run
    Touch { id: u64 },

    /// Kick up to `bound` buried or delayed jobs
    Kick { bound: u64 },

    /// Kick one job by id
    KickJob { id: u64 },

    /// Show a job by id
    Peek { id: u64 },

    /// Show the next ready job
    PeekReady,

    /// Show the next delayed job
    PeekDelayed,

    /// Show the next buried job
    PeekBuried,

    /// Server statistics
    Stats,

    /// Tube statistics
    StatsTube,

    /// Job statistics
    StatsJob { id: u64 },

    /// List all tubes
    ListTubes,

    /// Pause the tube
    Pause {
        /// Pause length in seconds
        seconds: u64,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder()
        .addr(&args.addr)
        .connect_timeout_ms(args.connect_timeout_ms)
        .build()?;

    tracing::debug!("beanstalk-cli v{} -> {}", beanstalk::VERSION, config.addr);

    let mut conn = Conn::connect(config)?;
    let tube = args.tube.as_str();

    match args.command {
        Commands::Put { body, pri, delay, ttr } => {
            let body = match body {
                Some(body) => body.into_bytes(),
                None => {
                    let mut buf = Vec::new();
                    std::io::stdin().read_to_end(&mut buf)?;
                    buf
                }
            };
            let id = conn.tube(tube)?.put(
                &body,
                pri,
                Duration::from_secs(delay),
                Duration::from_secs(ttr),
            )?;
            println!("{}", id);
        }
        Commands::Reserve { timeout } => {
            let job = conn
                .tube_set(&[tube])?
                .reserve(timeout.map(Duration::from_secs))?;
            print_job(&job);
        }
        Commands::Delete { id } => conn.delete(id)?,
        Commands::Release { id, pri, delay } => {
            conn.release(id, pri, Duration::from_secs(delay))?
        }
        Commands::Bury { id, pri } => conn.bury(id, pri)?,
        Commands::Touch { id } => conn.touch(id)?,
        Commands::Kick { bound } => println!("{}", conn.tube(tube)?.kick(bound)?),
        Commands::KickJob { id } => conn.kick_job(id)?,
        Commands::Peek { id } => print_job(&conn.peek(id)?),
        Commands::PeekReady => print_job(&conn.tube(tube)?.peek_ready()?),
        Commands::PeekDelayed => print_job(&conn.tube(tube)?.peek_delayed()?),
        Commands::PeekBuried => print_job(&conn.tube(tube)?.peek_buried()?),
        Commands::Stats => print_stats(&conn.stats()?),
        Commands::StatsTube => print_stats(&conn.stats_tube(tube)?),
        Commands::StatsJob { id } => print_stats(&conn.stats_job(id)?),
        Commands::ListTubes => {
            for name in conn.list_tubes()? {
                println!("{}", name);
            }
        }
        Commands::Pause { seconds } => conn.tube(tube)?.pause(Duration::from_secs(seconds))?,
    }

    conn.close()
}

fn print_job(job: &Job) {
    println!("id: {}", job.id);
    println!("{}", String::from_utf8_lossy(&job.body));
}

fn print_stats(stats: &Stats) {
    for (key, value) in stats.iter() {
        println!("{}: {}", key, value);
    }
}
