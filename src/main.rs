use std::hint::black_box;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::{info, warn};
use twin_buckets::bench::{time_lookups, LookupWorkload};
use twin_buckets::logger::initialize_logger;
use twin_buckets::{
    build_table, ChainingTable, HashTable, OpenAddressingTable, TableConfig, TableKind,
    TableResult,
};

#[derive(Parser)]
#[command(
    name = "twin_buckets",
    about = "Chaining vs. open addressing hash tables",
    version
)]
struct Cli {
    /// Log rehashes and other table internals.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk both tables through insert, find, remove and update.
    Demo,
    /// Time lookups on both tables across several table sizes.
    Analyze {
        #[arg(long, value_delimiter = ',', default_values_t = vec![100, 500, 1000, 2000])]
        sizes: Vec<usize>,
        /// Searches per inserted entry.
        #[arg(long, default_value_t = 5)]
        multiplier: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Time with a plain `Instant` instead of the benchmarking measurer.
        #[arg(long)]
        quick: bool,
    },
}

fn main() -> TableResult<()> {
    let cli: Cli = Cli::parse();
    initialize_logger(cli.verbose);

    match cli.command {
        Command::Demo => {
            demo_chaining()?;
            demo_open_addressing()?;
        }
        Command::Analyze {
            sizes,
            multiplier,
            seed,
            quick,
        } => analyze(&sizes, multiplier, seed, quick),
    }
    Ok(())
}

fn demo_chaining() -> TableResult<()> {
    println!("\nCHAINING TABLE DEMO");
    // small enough that the fifth insert doubles the buckets
    let mut table: ChainingTable<String, i32> =
        ChainingTable::with_config(TableConfig::new(5, 0.9)?);

    println!("1. inserting 8 entries:");
    for i in 1..=8 {
        let key: String = format!("key{}", i);
        let value: i32 = i * 100;
        table.insert(key.clone(), value)?;
        println!("   added {{{} -> {}}}", key, value);
    }
    print!("{}", table.display());

    println!("\n2. lookups:");
    match table.find(&"key3".to_string()) {
        Some(value) => println!("   found 'key3': {}", value),
        None => println!("   'key3' not found"),
    }
    if table.find(&"missing".to_string()).is_none() {
        println!("   'missing' correctly not found");
    }

    println!("\n3. removing an entry:");
    if table.remove(&"key4".to_string()) {
        println!("   removed 'key4'");
    }
    print!("{}", table.display());

    println!("\n4. updating a value:");
    table.insert("key2".to_string(), 9999)?;
    if let Some(value) = table.find(&"key2".to_string()) {
        println!("   updated 'key2': {}", value);
    }
    Ok(())
}

fn demo_open_addressing() -> TableResult<()> {
    println!("\nOPEN ADDRESSING TABLE DEMO");
    let mut table: OpenAddressingTable<String, String> =
        OpenAddressingTable::with_config(TableConfig::new(4, 0.9)?);

    println!("1. inserting entries:");
    let entries: [(&str, &str); 5] = [
        ("name", "Ivan"),
        ("surname", "Petrov"),
        ("city", "Moscow"),
        ("country", "Russia"),
        ("profession", "Programmer"),
    ];
    for (key, value) in entries {
        table.insert(key.to_string(), value.to_string())?;
        println!("   added {{{} -> {}}}", key, value);
    }
    print!("{}", table.display());

    println!("\n2. lookups:");
    for key in ["city", "profession"] {
        if let Some(value) = table.find(&key.to_string()) {
            println!("   {}: {}", key, value);
        }
    }

    println!("\n3. remove and reinsert:");
    if table.remove(&"country".to_string()) {
        println!("   removed 'country'");
    }
    table.insert("country".to_string(), "Belarus".to_string())?;
    println!("   reinserted 'country' with a new value");
    if let Some(value) = table.find(&"country".to_string()) {
        println!("   new country: {}", value);
    }
    print!("{}", table.display());
    Ok(())
}

fn analyze(sizes: &[usize], multiplier: usize, seed: u64, quick: bool) {
    println!("\nLOOKUP TIMING: CHAINING VS. OPEN ADDRESSING");
    println!(
        "{:>8} | {:>8} | {:>14} | {:>14} | {:>16}",
        "N", "M", "chaining (s)", "open addr (s)", "speedup"
    );

    for &n in sizes {
        let m: usize = n * multiplier;
        let workload: LookupWorkload = LookupWorkload::generate(n, m, seed ^ n as u64);
        match compare(&workload, quick) {
            Ok((chaining, open)) => {
                let chaining_secs: f64 = chaining.as_secs_f64();
                let open_secs: f64 = open.as_secs_f64();
                let speedup: String = if chaining_secs > 0.0 && open_secs > 0.0 {
                    let ratio: f64 = chaining_secs / open_secs;
                    if ratio > 1.0 {
                        format!("open addr x{:.2}", ratio)
                    } else {
                        format!("chaining x{:.2}", 1.0 / ratio)
                    }
                } else {
                    "n/a".to_string()
                };
                println!(
                    "{:>8} | {:>8} | {:>14.6} | {:>14.6} | {:>16}",
                    n, m, chaining_secs, open_secs, speedup
                );
            }
            Err(e) => {
                println!("{:>8} | {:>8} | error: {}", n, m, e);
            }
        }
    }
}

fn compare(workload: &LookupWorkload, quick: bool) -> TableResult<(Duration, Duration)> {
    let mut chaining: Box<dyn HashTable<String, i32>> =
        build_table(TableKind::Chaining, TableConfig::default());
    workload.fill(chaining.as_mut())?;
    let mut open: Box<dyn HashTable<String, i32>> =
        build_table(TableKind::OpenAddressing, TableConfig::default());
    workload.fill(open.as_mut())?;
    info!(
        "filled {} entries: chaining capacity {}, open addressing capacity {}",
        workload.entries.len(),
        chaining.capacity(),
        open.capacity()
    );

    Ok((
        measure(chaining.as_ref(), &workload.searches, quick),
        measure(open.as_ref(), &workload.searches, quick),
    ))
}

fn measure(table: &dyn HashTable<String, i32>, searches: &[String], quick: bool) -> Duration {
    if quick {
        return time_lookups(table, searches, 1);
    }
    let result = benchmarking::measure_function(|measurer| {
        measurer.measure(|| {
            for key in searches {
                black_box(table.find(key));
            }
        });
    });
    match result {
        Ok(result) => result.elapsed(),
        Err(_) => {
            warn!("benchmark measurement failed, falling back to Instant");
            time_lookups(table, searches, 1)
        }
    }
}
