//! umlfmt - Re-indenter for PlantUML diagram sources

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::{self, Cursor, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use glob::Pattern;
use rayon::prelude::*;
use tracing::Level;
use umlfmt::diagram::DiagramKind;
use umlfmt::process::format_file;
use umlfmt::{find_directive, parse_args, CliArgs, Config, Result};
use walkdir::WalkDir;

/// PlantUML file extensions to process
const PLANTUML_EXTENSIONS: &[&str] = &["puml", "plantuml", "pu", "uml", "iuml", "wsd"];

/// Default maximum file size in bytes (100 MB)
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

fn main() -> Result<()> {
    let args = parse_args();
    init_tracing(args.debug);

    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return Ok(());
    }

    if use_stdin {
        let config = build_config(&args, None)?;
        return process_stdin(&config, &args);
    }

    // An explicit config file applies to every input; otherwise each file
    // discovers its own
    let base_config = if args.config.is_some() {
        Some(build_config(&args, None)?)
    } else {
        None
    };

    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                tracing::warn!("failed to configure thread pool: {e}");
            }
        }
    }

    let files = collect_files(&args);

    if files.is_empty() {
        if !args.silent {
            eprintln!("No PlantUML files found to format.");
        }
        return Ok(());
    }

    let use_sequential = args.stdout || args.diff || args.detect || args.jobs == Some(1);
    let errors = if use_sequential {
        process_files_sequential(&files, base_config.as_ref(), &args)
    } else {
        process_files_parallel(&files, base_config.as_ref(), &args)
    };

    check_failures(errors)
}

/// Turn a non-zero failure count into an error exit
fn check_failures(errors: usize) -> Result<()> {
    if errors > 0 {
        anyhow::bail!("{errors} file(s) failed to format");
    }
    Ok(())
}

/// Install the stderr log subscriber
fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Build configuration from CLI args and optional config file
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!(path = %config_path.display(), "using explicit config file");
        Config::from_toml_file(config_path)?
    } else {
        let start = match for_path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().unwrap_or_default(),
        };
        let discovered = Config::discover_config_files(&start);
        if discovered.is_empty() {
            tracing::debug!(start = %start.display(), "no config files discovered");
        } else {
            for f in &discovered {
                tracing::debug!(start = %start.display(), file = %f.display(), "discovered config file");
            }
        }
        Config::from_discovered_files(&start)
    };

    if let Some(indent) = args.indent {
        config.indent = indent;
    }
    if args.no_indent {
        config.impose_indent = false;
    }
    if args.normalize_markers {
        config.normalize_markers = true;
    }

    tracing::debug!(
        indent = config.indent,
        impose_indent = config.impose_indent,
        normalize_markers = config.normalize_markers,
        "effective configuration"
    );

    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Collect all files to process, handling directories and recursive flag
fn collect_files(args: &CliArgs) -> Vec<PathBuf> {
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!("ignoring invalid exclude pattern {p:?}: {e}");
                None
            }
        })
        .collect();

    let custom_extensions = &args.extensions;

    let mut files = Vec::new();

    for input in &args.inputs {
        if input.is_file() {
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            if args.recursive {
                for entry in WalkDir::new(input)
                    .follow_links(true)
                    .max_depth(256)
                    .into_iter()
                    .filter_map(std::result::Result::ok)
                {
                    let path = entry.path();
                    if path.is_file()
                        && is_plantuml_file(path, custom_extensions)
                        && !is_excluded(path, &exclude_patterns)
                    {
                        files.push(path.to_path_buf());
                    }
                }
            } else if let Ok(entries) = std::fs::read_dir(input) {
                for entry in entries.filter_map(std::result::Result::ok) {
                    let path = entry.path();
                    if path.is_file()
                        && is_plantuml_file(&path, custom_extensions)
                        && !is_excluded(&path, &exclude_patterns)
                    {
                        files.push(path);
                    }
                }
            }
        } else {
            tracing::warn!("no such file or directory: {}", input.display());
        }
    }

    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    for pattern in patterns {
        if pattern.matches(&path_str) {
            return true;
        }

        if let Some(file_name) = path.file_name() {
            if pattern.matches(&file_name.to_string_lossy()) {
                return true;
            }
        }

        // Directory patterns match any component
        for component in path.components() {
            if let std::path::Component::Normal(c) = component {
                if pattern.matches(&c.to_string_lossy()) {
                    return true;
                }
            }
        }
    }

    false
}

/// Check if a file has a PlantUML extension (case-insensitive)
fn is_plantuml_file(path: &Path, custom_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            PLANTUML_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
                || custom_extensions.iter().any(|custom| {
                    let custom = custom.strip_prefix('.').unwrap_or(custom);
                    custom.eq_ignore_ascii_case(ext)
                })
        })
}

/// Resolve the configuration for one file
fn config_for(path: &Path, base_config: Option<&Config>, args: &CliArgs) -> Result<Config> {
    match base_config {
        Some(config) => Ok(config.clone()),
        None => build_config(args, Some(path)),
    }
}

/// Process files sequentially (stdout, diff and detect modes)
///
/// Returns the number of files that failed.
fn process_files_sequential(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> usize {
    let mut errors = 0;
    for path in files {
        let file_result =
            config_for(path, base_config, args).and_then(|config| process_single_file(path, &config, args));

        if let Err(e) = file_result {
            errors += 1;
            eprintln!("Error formatting {}: {}", path.display(), e);
        }
    }
    errors
}

/// Process files in parallel using Rayon
///
/// Returns the number of files that failed.
fn process_files_parallel(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> usize {
    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        let file_result =
            config_for(path, base_config, args).and_then(|config| process_single_file(path, &config, args));

        match file_result {
            Ok(()) => {
                success_count.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                eprintln!("Error formatting {}: {}", path.display(), e);
            }
        }
    });

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    if !args.silent {
        if errors == 0 {
            eprintln!("Formatted {success} files successfully.");
        } else {
            eprintln!("Formatted {success} files, {errors} errors.");
        }
    }
    errors
}

/// Apply an in-file directive, if any, on top of `config`
fn apply_directive_overrides(config: &mut Config, contents: &[u8], source_name: &str) {
    let text = String::from_utf8_lossy(contents);
    if let Some(overrides) = find_directive(&text) {
        tracing::debug!(source = source_name, "found file directive");
        overrides.apply_to(config);
    }
}

/// Process a single file
fn process_single_file(path: &Path, config: &Config, args: &CliArgs) -> Result<()> {
    let metadata = std::fs::metadata(path)?;
    let file_size = metadata.len();
    if file_size > DEFAULT_MAX_FILE_SIZE {
        if !args.silent {
            eprintln!(
                "Skipping {} ({} MB exceeds limit of {} MB)",
                path.display(),
                file_size / (1024 * 1024),
                DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
            );
        }
        return Ok(());
    }

    let file_contents = std::fs::read(path)?;
    let name = path.to_string_lossy();

    if args.detect {
        let kind = DiagramKind::detect(&String::from_utf8_lossy(&file_contents));
        println!("{}: {kind}", path.display());
        return Ok(());
    }

    if !args.silent && !args.stdout && !args.diff {
        eprintln!("Formatting: {}", path.display());
    }

    let mut file_config = config.clone();
    apply_directive_overrides(&mut file_config, &file_contents, &name);
    if let Some(error) = file_config.validate() {
        anyhow::bail!("Invalid directive: {error}");
    }

    let mut output = Vec::new();
    format_file(Cursor::new(&file_contents), &mut output, &file_config, &name)?;

    if args.stdout {
        io::stdout().write_all(&output)?;
    } else if args.diff {
        if !args.silent {
            println!("=== {} ===", path.display());
        }
        io::stdout().write_all(&output)?;
    } else if output != file_contents {
        std::fs::write(path, &output)?;
    } else {
        tracing::debug!(file = %path.display(), "already formatted");
    }

    Ok(())
}

/// Process input from stdin, output to stdout
fn process_stdin(config: &Config, args: &CliArgs) -> Result<()> {
    let mut stdin_contents = Vec::new();
    io::stdin().read_to_end(&mut stdin_contents)?;

    let stdin_size = stdin_contents.len() as u64;
    if stdin_size > DEFAULT_MAX_FILE_SIZE {
        anyhow::bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    if args.detect {
        let kind = DiagramKind::detect(&String::from_utf8_lossy(&stdin_contents));
        println!("{kind}");
        return Ok(());
    }

    let mut file_config = config.clone();
    apply_directive_overrides(&mut file_config, &stdin_contents, "stdin");
    if let Some(error) = file_config.validate() {
        anyhow::bail!("Invalid directive: {error}");
    }

    let mut output = Vec::new();
    format_file(Cursor::new(&stdin_contents), &mut output, &file_config, "stdin")?;

    io::stdout().write_all(&output)?;

    if !args.silent {
        eprintln!("Formatted stdin successfully.");
    }

    Ok(())
}

fn print_usage() {
    println!(
        "umlfmt v{} - PlantUML source re-indenter",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Usage:");
    println!("  umlfmt [OPTIONS] <FILE>...");
    println!("  umlfmt [OPTIONS] -r <DIRECTORY>");
    println!("  umlfmt [OPTIONS] -              # Read from stdin");
    println!("  cat flow.puml | umlfmt          # Pipe input");
    println!();
    println!("Examples:");
    println!("  umlfmt flow.puml                # Format single file in-place");
    println!("  umlfmt -r docs/                 # Recursively format directory");
    println!("  umlfmt --stdout flow.puml       # Output to stdout");
    println!("  umlfmt -i 4 flow.puml           # Use 4-space indent");
    println!("  umlfmt --detect docs/*.puml     # Print diagram kinds");
    println!();
    println!("Options:");
    println!("  -i, --indent <NUM>              Indent size [default: 2]");
    println!("      --no-indent                 Disable indentation");
    println!("      --normalize-markers         Put @startuml/@enduml on their own lines");
    println!("  -r, --recursive                 Process directories recursively");
    println!("  -e, --exclude <PATTERN>         Exclude files/dirs matching pattern (repeatable)");
    println!("  -x, --extension <EXT>           Additional file extension (repeatable)");
    println!("  -j, --jobs <NUM>                Parallel jobs (0=auto, 1=sequential)");
    println!("  -s, --stdout                    Output to stdout");
    println!("  -d, --diff                      Show formatted output without writing");
    println!("  -c, --config <FILE>             Config file path (overrides auto-discovery)");
    println!("      --detect                    Print detected diagram kind");
    println!("  -D, --debug                     Enable debug output");
    println!("  -S, --silent                    Silent mode");
    println!("  -h, --help                      Print help");
    println!();
    println!("Supported extensions: .puml, .plantuml, .pu, .uml, .iuml, .wsd");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for umlfmt.toml in the home directory and in parent");
    println!("  directories of the file being formatted. Closer files win.");
    println!();
    println!("In-file directive:");
    println!("  ' umlfmt: --indent 4 --normalize-markers");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extensions() {
        assert!(is_plantuml_file(Path::new("docs/flow.puml"), &[]));
        assert!(is_plantuml_file(Path::new("docs/flow.PUML"), &[]));
        assert!(is_plantuml_file(Path::new("a.wsd"), &[]));
        assert!(!is_plantuml_file(Path::new("a.txt"), &[]));
        assert!(!is_plantuml_file(Path::new("Makefile"), &[]));
    }

    #[test]
    fn test_custom_extensions_ignore_case() {
        let custom = vec!["txt".to_string(), ".Diagram".to_string()];
        assert!(is_plantuml_file(Path::new("a.txt"), &custom));
        assert!(is_plantuml_file(Path::new("a.TXT"), &custom));
        assert!(is_plantuml_file(Path::new("a.diagram"), &custom));
        assert!(!is_plantuml_file(Path::new("a.md"), &custom));
    }

    #[test]
    fn test_is_excluded() {
        let patterns = vec![Pattern::new("build*").unwrap()];
        assert!(is_excluded(Path::new("build-out/a.puml"), &patterns));
        assert!(!is_excluded(Path::new("src/a.puml"), &patterns));
        assert!(!is_excluded(Path::new("build/a.puml"), &[]));
    }

    #[test]
    fn test_check_failures() {
        assert!(check_failures(0).is_ok());
        let err = check_failures(2).unwrap_err();
        assert!(err.to_string().contains("2 file(s) failed"));
    }
}
