use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_keys, OutputFormat};

pub fn run(format: OutputFormat) -> CliResult<i32> {
    print_keys(format);
    Ok(SUCCESS)
}
