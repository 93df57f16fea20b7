//! flato CLI - file compression tool.
//!
//! Compresses and decompresses files with the huffman, lzss, flate, or gzip
//! codec, and runs a small demonstration HTTP server that decodes uploads.

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use flato::compress::deflate::Deflater;
use flato::stream;
use flato::Algorithm;

/// A DEFLATE/gzip compression engine with standalone Huffman and LZSS codecs.
#[derive(Parser, Debug)]
#[command(name = "flato")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress one or more files.
    Compress {
        /// Input files.
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Compression algorithm.
        #[arg(long, default_value = "gzip")]
        algorithm: String,

        /// Delete the input file after compressing it.
        #[arg(long)]
        delete: bool,

        /// Extension appended to each output file name.
        #[arg(long, default_value = ".flo")]
        outfileext: String,

        /// DEFLATE block type (flate/gzip only; only 2 is implemented).
        #[arg(long, default_value_t = 2)]
        btype: u8,

        /// DEFLATE final-block flag (flate/gzip only).
        #[arg(long, default_value_t = 1)]
        bfinal: u8,
    },
    /// Decompress one or more files.
    Decompress {
        /// Compressed input files.
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Compression algorithm the files were produced with.
        #[arg(long, default_value = "gzip")]
        algorithm: String,

        /// Delete the compressed file after decompressing it.
        #[arg(long)]
        delete: bool,
    },
    /// Run the demonstration HTTP server.
    ///
    /// Accepts POST requests whose Content-Encoding header names one of the
    /// algorithms, decodes the body, and stores it to
    /// server-decompressed.txt.
    Server {
        /// Port to listen on.
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Compress {
            files,
            algorithm,
            delete,
            outfileext,
            btype,
            bfinal,
        } => {
            let algorithm = parse_algorithm(&algorithm)?;
            let deflater = Deflater::with_header(btype, bfinal != 0);
            for file in &files {
                compress_file(file, algorithm, deflater, &outfileext)?;
                if delete {
                    fs::remove_file(file).map_err(|e| format!("delete {}: {e}", file.display()))?;
                }
            }
            Ok(())
        }
        Command::Decompress {
            files,
            algorithm,
            delete,
        } => {
            let algorithm = parse_algorithm(&algorithm)?;
            for file in &files {
                decompress_file(file, algorithm)?;
                if delete {
                    fs::remove_file(file).map_err(|e| format!("delete {}: {e}", file.display()))?;
                }
            }
            Ok(())
        }
        Command::Server { port } => serve(port),
    }
}

fn parse_algorithm(name: &str) -> Result<Algorithm, String> {
    name.parse().map_err(|_| {
        let names: Vec<&str> = Algorithm::ALL.iter().map(|a| a.name()).collect();
        format!("unsupported algorithm {name:?}; choices are {}", names.join(", "))
    })
}

fn compress_file(
    path: &Path,
    algorithm: Algorithm,
    deflater: Deflater,
    extension: &str,
) -> Result<(), String> {
    let content = fs::read(path).map_err(|e| format!("read {}: {e}", path.display()))?;

    println!("Compressing {} with {algorithm}...", path.display());
    let (mut writer, mut reader) = stream::encoder_with(algorithm, deflater);
    writer
        .write(&content)
        .and_then(|_| writer.close())
        .map_err(|e| e.to_string())?;
    let compressed = reader.read_to_end().map_err(|e| e.to_string())?;

    let mut out_path = path.as_os_str().to_owned();
    out_path.push(extension);
    fs::write(&out_path, &compressed)
        .map_err(|e| format!("write {}: {e}", PathBuf::from(&out_path).display()))?;

    println!("Original size (in bytes): {}", content.len());
    println!("Compressed size (in bytes): {}", compressed.len());
    if !content.is_empty() {
        println!(
            "Compression ratio: {:.2}%",
            compressed.len() as f64 / content.len() as f64 * 100.0
        );
    }
    Ok(())
}

fn decompress_file(path: &Path, algorithm: Algorithm) -> Result<(), String> {
    let content = fs::read(path).map_err(|e| format!("read {}: {e}", path.display()))?;

    println!("Decompressing {} with {algorithm}...", path.display());
    let (mut writer, mut reader) = stream::decoder(algorithm);
    writer
        .write(&content)
        .and_then(|_| writer.close())
        .map_err(|e| e.to_string())?;
    let decompressed = reader.read_to_end().map_err(|e| e.to_string())?;

    // Strip the compression extension; fall back to a suffix when there is
    // none to strip.
    let out_path = match (path.file_stem(), path.extension()) {
        (Some(stem), Some(_)) => path.with_file_name(stem),
        _ => {
            let mut name = path.as_os_str().to_owned();
            name.push(".out");
            PathBuf::from(name)
        }
    };
    fs::write(&out_path, &decompressed)
        .map_err(|e| format!("write {}: {e}", out_path.display()))?;
    println!("Wrote {}", out_path.display());
    Ok(())
}

/// Minimal HTTP/1.1 loop: one request per connection, bodies decoded
/// through the streaming decoder named by Content-Encoding.
fn serve(port: u16) -> Result<(), String> {
    let listener = TcpListener::bind(("127.0.0.1", port))
        .map_err(|e| format!("bind port {port}: {e}"))?;
    println!("Server listening on port {port}...");

    for connection in listener.incoming() {
        let stream = match connection {
            Ok(stream) => stream,
            Err(e) => {
                eprintln!("accept failed: {e}");
                continue;
            }
        };
        if let Err(e) = handle_request(stream) {
            eprintln!("request failed: {e}");
        }
    }
    Ok(())
}

fn handle_request(stream: TcpStream) -> Result<(), String> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .map_err(|e| e.to_string())?;

    let mut content_length = 0usize;
    let mut content_encoding = None;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).map_err(|e| e.to_string())?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            match name.to_ascii_lowercase().as_str() {
                "content-length" => {
                    content_length = value.parse().map_err(|_| "bad Content-Length")?;
                }
                "content-encoding" => content_encoding = Some(value.to_string()),
                _ => {}
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).map_err(|e| e.to_string())?;

    let outcome = decode_body(&body, content_encoding.as_deref());
    let mut stream = reader.into_inner();
    match outcome {
        Ok(decoded) => {
            fs::write("server-decompressed.txt", &decoded).map_err(|e| e.to_string())?;
            println!("Client data has been saved into `server-decompressed.txt`");
            let response = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\n\r\nok\n";
            stream.write_all(response.as_bytes()).map_err(|e| e.to_string())
        }
        Err(message) => {
            let response = format!(
                "HTTP/1.1 400 Bad Request\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\r\n{message}\n",
                message.len() + 1
            );
            stream.write_all(response.as_bytes()).map_err(|e| e.to_string())
        }
    }
}

fn decode_body(body: &[u8], encoding: Option<&str>) -> Result<Vec<u8>, String> {
    let Some(encoding) = encoding else {
        return Ok(body.to_vec());
    };
    let algorithm = parse_algorithm(encoding)?;
    let (mut writer, mut reader) = stream::decoder(algorithm);
    writer
        .write(body)
        .and_then(|_| writer.close())
        .map_err(|e| e.to_string())?;
    reader.read_to_end().map_err(|e| e.to_string())
}
