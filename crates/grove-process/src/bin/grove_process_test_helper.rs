use std::{
    env, fs,
    io::{self, Write},
    process, thread,
    time::Duration,
};

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> String {
    args.next().unwrap_or_else(|| {
        eprintln!("missing value for {flag}");
        process::exit(2);
    })
}

fn parse<T: std::str::FromStr>(value: String, flag: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        eprintln!("invalid value for {flag}: {value}");
        process::exit(2);
    })
}

fn write_repeated(mut writer: impl Write, mut bytes: usize, fill: u8) -> io::Result<()> {
    let buf = [fill; 8 * 1024];
    while bytes > 0 {
        let n = bytes.min(buf.len());
        writer.write_all(&buf[..n])?;
        bytes -= n;
    }
    writer.flush()
}

fn main() {
    let mut args = env::args().skip(1);
    let mut exit_code = 0;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--stdout-bytes" => {
                let bytes = parse(next_value(&mut args, &arg), &arg);
                write_repeated(io::stdout().lock(), bytes, b'a').unwrap();
            }
            "--stdout" => {
                let text = next_value(&mut args, &arg);
                println!("{text}");
            }
            "--stderr" => {
                let text = next_value(&mut args, &arg);
                eprintln!("{text}");
            }
            "--write-file" => {
                let path = next_value(&mut args, &arg);
                let contents = next_value(&mut args, &arg);
                fs::write(&path, contents).unwrap();
            }
            "--print-cwd" => {
                println!("{}", env::current_dir().unwrap().display());
            }
            "--sleep-ms" => {
                let ms = parse(next_value(&mut args, &arg), &arg);
                thread::sleep(Duration::from_millis(ms));
            }
            "--exit" => {
                exit_code = parse(next_value(&mut args, &arg), &arg);
            }
            other => {
                eprintln!("unknown argument: {other}");
                process::exit(2);
            }
        }
    }
    process::exit(exit_code);
}
