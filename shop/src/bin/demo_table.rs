// Demo: option table built from an explicit list.
//
//   demo-table -h
//   demo-table -v -n 42 -f data.txt -b true -d 3.14
//   demo-table -vn 42 -fdata.txt -b1 -d2.5

use shop::{Opt, Registry, ValueKind};

fn main() -> shop::Result<()> {
    let mut opts = Registry::from_options([
        Opt::new('h').description("Show help"),
        Opt::new('v').description("Verbose mode"),
        Opt::new('n')
            .takes_arg()
            .kind(ValueKind::Int)
            .description("Number (int)"),
        Opt::new('f')
            .takes_arg()
            .kind(ValueKind::Str)
            .description("Filename (string)"),
        Opt::new('b')
            .takes_arg()
            .kind(ValueKind::Bool)
            .description("Boolean flag"),
        Opt::new('d')
            .takes_arg()
            .kind(ValueKind::Float)
            .description("Double value"),
    ])?;

    if let Err(err) = opts.track() {
        eprintln!("{}", err);
        std::process::exit(1);
    }

    if opts.used('h').is_some() {
        opts.print_help();
        return Ok(());
    }

    println!("=== Parsing Results ===");

    if opts.used('v').is_some() {
        println!("Verbose mode: ON");
    }
    if let Some(number) = opts.first::<i64>('n') {
        println!("Number: {}", number);
    }
    if let Some(filename) = opts.first::<String>('f') {
        println!("Filename: {}", filename);
    }
    if let Some(flag) = opts.first::<bool>('b') {
        println!("Boolean flag: {}", flag);
    }
    if let Some(value) = opts.first::<f64>('d') {
        println!("Double value: {:.2}", value);
    }
    if opts.used('x').is_none() {
        println!("Option -x not used");
    }

    Ok(())
}
