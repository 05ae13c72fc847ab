// Demo: option table built from a compact specification string.
//
//   demo-spec -h
//   demo-spec -v -n 42 -f data.txt -b true -p 3.14
//   demo-spec -vn 42 -fdata.txt -b1

use shop::{Registry, ValueKind};

fn main() -> shop::Result<()> {
    let mut opts = Registry::from_spec("vn:f:b:p:h")?;

    opts.describe('h', None, "Show this help message")?;
    opts.describe('v', None, "Enable verbose output")?;
    opts.describe('n', Some(ValueKind::Int), "Number (int)")?;
    opts.describe('f', Some(ValueKind::Str), "Filename (string)")?;
    opts.describe('b', Some(ValueKind::Bool), "Boolean flag")?;
    opts.describe('p', Some(ValueKind::Float), "Precision (float)")?;

    if let Err(err) = opts.track() {
        eprintln!("{}", err);
        std::process::exit(1);
    }

    if opts.used('h').is_some() {
        opts.print_help();
        return Ok(());
    }

    for (idx, number) in opts.values_of::<i64>('n').enumerate() {
        println!("number[{}]: {}", idx, number);
    }
    if let Some(filename) = opts.first::<String>('f') {
        println!("filename: {}", filename);
    }
    if let Some(flag) = opts.first::<bool>('b') {
        println!("flag: {}", flag);
    }
    if let Some(precision) = opts.first::<f64>('p') {
        println!("precision: {}", precision);
    }

    if opts.used('v').is_some() {
        opts.print_verbose();
    }

    Ok(())
}
