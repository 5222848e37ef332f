//! # paramfig demo application
//!
//! A sample CLI tool showing how an application wires paramfig in. It exists
//! to demonstrate and manually verify the resolution layers.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example paramfig_demo -- run
//! cargo run --example paramfig_demo -- params list
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature             | How to exercise it                                                     |
//! |---------------------|------------------------------------------------------------------------|
//! | Defaults            | `cargo run --example paramfig_demo -- run`                             |
//! | Config file (cwd)   | Put `PORT 9000` in `paramfig-demo.conf` in cwd, then `run`             |
//! | Env var override    | `PARAMFIG_DEMO_PORT=9100 cargo run --example paramfig_demo -- run`     |
//! | Short flag          | `cargo run --example paramfig_demo -- run -p 9200`                     |
//! | Long flag           | `cargo run --example paramfig_demo -- run --color blue`                |
//! | Bool switch         | `cargo run --example paramfig_demo -- run --verbose`                   |
//! | Positional args     | `cargo run --example paramfig_demo -- run -v a.txt b.txt`              |
//! | Rejected value      | `cargo run --example paramfig_demo -- run --port 70000`                |
//! | `params gen`        | `cargo run --example paramfig_demo -- params gen`                      |
//! | `params get`        | `cargo run --example paramfig_demo -- params get port`                 |
//! | `params set`        | `cargo run --example paramfig_demo -- params set color red`            |

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use paramfig::{
    Overrides, ParamArgs, ParamfigError, Param, Paramfig, ParameterStore, Schema, SearchPath,
};

/// paramfig demo: resolve a handful of parameters and print them.
#[derive(Parser, Debug)]
#[command(name = "paramfig-demo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve parameters from ARGS and print every value.
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Inspect parameters (list, get, set, gen).
    Params(ParamArgs),
}

fn schema() -> Result<Schema, ParamfigError> {
    Paramfig::builder()
        .app_name("paramfig-demo")
        .search_paths(vec![SearchPath::Cwd, SearchPath::Home(".paramfig-demo")])
        .allow_unset_values(true)
        .param(
            Param::string("host")
                .default("localhost")
                .cmd_line(None, Some("host"))
                .help("Address to bind."),
        )
        .param(
            Param::int("port")
                .default(8080)
                .allowed_range(1, 65535)
                .help("Port to listen on."),
        )
        .param(
            Param::string("color")
                .default("yellow")
                .allowed_values(["red", "green", "yellow", "blue"])
                .help("Output color."),
        )
        .param(Param::bool("verbose").default(false).help("Print more."))
        .param(
            Param::string("user")
                .no_cmd_line()
                .help("Account name. Only read from the file or environment."),
        )
        .build()
}

fn run(cli: Cli) -> Result<(), ParamfigError> {
    let mut store: ParameterStore = schema()?.into_store();

    match cli.command {
        Commands::Run { args } => {
            store.acquire(args, &Overrides::default())?;
            for (key, value) in store.items() {
                let source = store
                    .source(key)?
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unset".to_string());
                match value {
                    Some(v) => println!("{key} = {v}  ({source})"),
                    None => println!("{key} is not set"),
                }
            }
            if !store.args().is_empty() {
                println!("args: {}", store.args().join(" "));
            }
        }
        Commands::Params(params) => {
            store.acquire(Vec::<String>::new(), &Overrides::default())?;
            let result = store.handle(&params.into_action())?;
            println!("{result}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(ParamfigError::InvalidValues(errors)) => {
            for e in errors {
                eprintln!("error: {e}");
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
