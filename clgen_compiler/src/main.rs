use clgen_compiler::backend::BackendKind;
use clgen_compiler::config::runtime::RuntimeConfig;
use clgen_compiler::{logging, pipeline};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RuntimeConfig::default();

    // Initialize global logging system
    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;

    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("clgen");

    let options = match parse_cli_options(args.get(1..).unwrap_or(&[])) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} [options] <file>", program_name);
            eprintln!("       {} --help", program_name);
            std::process::exit(1);
        }
    };

    if options.help {
        print_help(program_name);
        return Ok(());
    }
    if options.version {
        println!("CLGen {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut pipeline_options = match pipeline::PipelineOptions::from_config(&config) {
        Ok(pipeline_options) => pipeline_options,
        Err(error) => {
            eprintln!("Error: {}", error);
            std::process::exit(1);
        }
    };
    if options.output_dir.is_some() {
        pipeline_options.output_dir = options.output_dir.clone();
    }
    if let Some(backends) = &options.backends {
        pipeline_options.backends = backends.clone();
    }

    let Some(input) = options.input.as_ref() else {
        eprintln!("Error: no input file given");
        std::process::exit(1);
    };

    println!("CLGen {}", env!("CARGO_PKG_VERSION"));
    let show_paths = !options.quiet && config.output.print_written_paths;

    if options.reverse {
        match pipeline::process_reverse(input, &pipeline_options) {
            Ok(path) => {
                if show_paths {
                    println!("{}", path.display());
                }
                println!("{}", pipeline::summary_line(0, 0));
            }
            Err(error) => fail(&error),
        }
        return Ok(());
    }

    match pipeline::process_file(input, &pipeline_options) {
        Ok(result) => {
            if show_paths {
                for path in &result.written {
                    println!("{}", path.display());
                }
            }
            if !options.quiet {
                for warning in &result.warnings {
                    eprintln!("{}", warning);
                }
            }
            println!("{}", result.summary());
        }
        Err(error) => fail(&error),
    }

    Ok(())
}

fn fail(error: &pipeline::PipelineError) -> ! {
    eprintln!("{}", failure_report(error));
    println!("{}", pipeline::summary_line(error.error_count(), 0));
    std::process::exit(1);
}

/// The diagnostics of a failed run, printed once.
fn failure_report(error: &pipeline::PipelineError) -> String {
    match error.report() {
        Some(report) => report.to_string(),
        None => format!("error: {}", error),
    }
}

fn print_help(program_name: &str) {
    println!("CLGen {}", env!("CARGO_PKG_VERSION"));
    println!("Checklist compiler for flight simulator tutorials and documents");
    println!();
    println!("USAGE:");
    println!("    {} [options] <input.clg>          # Generate outputs", program_name);
    println!("    {} --reverse <checklists.xml>     # Rebuild source", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help                  Show this help message");
    println!("    --version               Show the compiler version");
    println!("    --output-dir DIR        Write generated files to DIR");
    println!("    --backend LIST          Comma separated backends (default: all)");
    println!("    --reverse               Read generated markup and emit source");
    println!("    --quiet                 Only print the summary line");
    println!();
    println!("BACKENDS:");
    for kind in BackendKind::ALL {
        println!("    {}", kind);
    }
    println!();
    println!("EXAMPLES:");
    println!("    {} c172p.clg", program_name);
    println!("    {} c172p.clg --backend xml,clist --output-dir out/", program_name);
    println!("    {} --reverse out/checklists.xml", program_name);
}

#[derive(Debug, Default)]
struct CliOptions {
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    backends: Option<Vec<BackendKind>>,
    reverse: bool,
    quiet: bool,
    help: bool,
    version: bool,
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => options.help = true,
            "--version" | "-V" => options.version = true,
            "--reverse" => options.reverse = true,
            "--quiet" | "-q" => options.quiet = true,
            "--output-dir" | "-o" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("{} requires a directory", args[i]))?;
                options.output_dir = Some(PathBuf::from(value));
                i += 1;
            }
            "--backend" | "-b" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("{} requires a backend list", args[i]))?;
                let names: Vec<String> = value.split(',').map(str::to_string).collect();
                let kinds = BackendKind::parse_list(&names).map_err(|e| e.to_string())?;
                if kinds.is_empty() {
                    return Err("--backend requires at least one backend".to_string());
                }
                options.backends = Some(kinds);
                i += 1;
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("unknown option '{}'", flag));
            }
            path => {
                if options.input.is_some() {
                    return Err(format!("unexpected argument '{}'", path));
                }
                options.input = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    if options.input.is_none() && !options.help && !options.version {
        return Err("no input file given".to_string());
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_cli_options() {
        let options = parse_cli_options(&args(&[
            "--backend",
            "clist,xml",
            "--output-dir",
            "out",
            "--quiet",
            "c172p.clg",
        ]))
        .unwrap();

        assert_eq!(options.input, Some(PathBuf::from("c172p.clg")));
        assert_eq!(options.output_dir, Some(PathBuf::from("out")));
        assert_eq!(
            options.backends,
            Some(vec![BackendKind::Line, BackendKind::Markup])
        );
        assert!(options.quiet);
        assert!(!options.reverse);
    }

    #[test]
    fn test_parse_reverse() {
        let options = parse_cli_options(&args(&["--reverse", "checklists.xml"])).unwrap();
        assert!(options.reverse);
        assert_eq!(options.input, Some(PathBuf::from("checklists.xml")));
    }

    #[test]
    fn test_help_needs_no_input() {
        assert!(parse_cli_options(&args(&["--help"])).unwrap().help);
        assert!(parse_cli_options(&args(&["--version"])).unwrap().version);
    }

    #[test]
    fn test_parse_cli_options_invalid() {
        assert!(parse_cli_options(&args(&[])).is_err());
        assert!(parse_cli_options(&args(&["--backend", "pdf", "a.clg"])).is_err());
        assert!(parse_cli_options(&args(&["--backend"])).is_err());
        assert!(parse_cli_options(&args(&["--threads", "4", "a.clg"])).is_err());
        assert!(parse_cli_options(&args(&["a.clg", "b.clg"])).is_err());
    }

    #[test]
    fn test_failure_report_prints_diagnostics_once() {
        let report = "error[E0301]: unknown item 'Gear'\n  --> a.clg:3:11";
        let error = pipeline::PipelineError::pass_failed("semantic", 1, report.to_string());
        let text = failure_report(&error);
        assert_eq!(text, report);
        assert_eq!(text.matches("unknown item").count(), 1);

        let bare = pipeline::PipelineError::pass_failed("semantic", 2, String::new());
        assert_eq!(
            failure_report(&bare),
            "error: semantic stage failed with 2 error(s)"
        );
    }
}
