/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs::{read, remove_file, File};
use std::process::exit;

use clap::ArgMatches;
use log::{error, info, Level};
use ungzip_inflate::GzipDecoder;

use crate::cmd_args::create_cmd_args;

mod cmd_args;

fn setup_logger(options: &ArgMatches)
{
    let log_level;

    if *options.get_one::<bool>("debug").unwrap()
    {
        log_level = Level::Debug;
    }
    else if *options.get_one::<bool>("trace").unwrap()
    {
        log_level = Level::Trace;
    }
    else if *options.get_one::<bool>("warn").unwrap()
    {
        log_level = Level::Warn;
    }
    else if *options.get_one::<bool>("info").unwrap()
    {
        log_level = Level::Info;
    }
    else
    {
        log_level = Level::Error;
    }

    simple_logger::init_with_level(log_level).unwrap();
}

fn main()
{
    let options = create_cmd_args().get_matches();

    setup_logger(&options);

    exit(run(&options));
}

fn run(options: &ArgMatches) -> i32
{
    let input = options.get_one::<String>("input").unwrap();

    let output = match input.strip_suffix(".gz")
    {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ =>
        {
            error!("{} does not name a .gz file", input);
            return 1;
        }
    };

    let contents = match read(input)
    {
        Ok(contents) => contents,
        Err(err) =>
        {
            error!("Could not read {}: {}", input, err);
            return 1;
        }
    };

    let mut sink = match File::create(&output)
    {
        Ok(file) => file,
        Err(err) =>
        {
            error!("Could not create {}: {}", output, err);
            return 1;
        }
    };

    let mut decoder = GzipDecoder::new(&contents);

    match decoder.decode_into(&mut sink)
    {
        Ok(written) =>
        {
            info!("{} -> {} ({} bytes)", input, output, written);
            0
        }
        Err(err) =>
        {
            error!("Could not decompress {}, reason {:?}", input, err);
            drop(sink);

            if let Err(err) = remove_file(&output)
            {
                error!("Could not remove partial output {}: {}", output, err);
            }
            1
        }
    }
}
