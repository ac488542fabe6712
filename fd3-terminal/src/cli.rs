/// Command-line options
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: fd3-terminal [OPTIONS]

Options:
  --config <file.json>  Load settings from a JSON file
  --export <file.stl>   Write the model as STL
  --ascii               Use ASCII STL instead of binary
  --svg <file.svg>      Write the Hasse diagram as SVG
  --dot                 Print the Hasse diagram as Graphviz DOT
  --no-view             Do not open the interactive viewer
  -h, --help            Show this message";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub config: Option<PathBuf>,
    pub export: Option<PathBuf>,
    pub ascii: bool,
    pub svg: Option<PathBuf>,
    pub dot: bool,
    pub no_view: bool,
    pub help: bool,
}

impl Options {
    /// Parse arguments, program name excluded
    pub fn parse<I, S>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = Options::default();
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .map(PathBuf::from)
                    .ok_or_else(|| format!("{flag} needs a path"))
            };
            match arg.as_str() {
                "--config" => options.config = Some(value("--config")?),
                "--export" => options.export = Some(value("--export")?),
                "--svg" => options.svg = Some(value("--svg")?),
                "--ascii" => options.ascii = true,
                "--dot" => options.dot = true,
                "--no-view" => options.no_view = true,
                "-h" | "--help" => options.help = true,
                other => return Err(format!("unknown argument: {other}")),
            }
        }
        Ok(options)
    }
}
