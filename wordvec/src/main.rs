//! 単語ベクトルを出力するユーティリティ
//!
//! このバイナリは、標準入力から読み込んだ単語について、指定された出力形式
//! (vector、ngrams、nn、similarity)で結果を出力します。

use std::error::Error;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use fasttext_vectors::{ByteOrder, LoadOptions, Model};

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Vector,
    Ngrams,
    Nn,
    Similarity,
}

/// `OutputMode` の `FromStr` 実装
impl FromStr for OutputMode {
    type Err = &'static str;

    /// 文字列から出力モードをパースする
    ///
    /// # 引数
    ///
    /// * `mode` - パース対象の文字列（"vector"、"ngrams"、"nn"、"similarity"のいずれか）
    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "vector" => Ok(Self::Vector),
            "ngrams" => Ok(Self::Ngrams),
            "nn" => Ok(Self::Nn),
            "similarity" => Ok(Self::Similarity),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// バイトオーダーの指定
#[derive(Clone, Debug)]
struct ByteOrderArg(ByteOrder);

impl FromStr for ByteOrderArg {
    type Err = &'static str;

    fn from_str(order: &str) -> Result<Self, Self::Err> {
        match order {
            "big" => Ok(Self(ByteOrder::BigEndian)),
            "little" => Ok(Self(ByteOrder::LittleEndian)),
            _ => Err("Could not parse a byte order"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "wordvec", about = "Prints fastText word vectors")]
struct Args {
    /// fastText binary model (.bin).
    #[clap(short = 'i', long)]
    model: PathBuf,

    /// Reads the model through a zstd decoder.
    #[clap(short = 'z', long)]
    zstd: bool,

    /// Byte order of the model file. Choices are big and little. Detected from the magic number by default.
    #[clap(short = 'b', long)]
    byte_order: Option<ByteOrderArg>,

    /// Output mode. Choices are vector, ngrams, nn, and similarity.
    #[clap(short = 'O', long, default_value = "vector")]
    mode: OutputMode,

    /// Number of neighbors printed in nn mode.
    #[clap(short = 'k', long, default_value = "10")]
    k: usize,
}

/// メイン関数
///
/// モデルをロードし、標準入力の各行に含まれる単語について、
/// 指定された形式で結果を標準出力に出力します。
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wordvec=info,fasttext_vectors=info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let mut options = LoadOptions::new();
    if let Some(ByteOrderArg(order)) = args.byte_order {
        options = options.byte_order(order);
    }

    eprintln!("Loading the model...");
    let model = if args.zstd {
        Model::from_zstd_with_options(&args.model, &options)?
    } else {
        Model::from_path_with_options(&args.model, &options)?
    };

    eprintln!("Ready to query");

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let lines = std::io::stdin().lock().lines();
    for line in lines {
        let line = line?;
        match args.mode {
            OutputMode::Vector => {
                for word in line.split_whitespace() {
                    writeln!(&mut out, "{word} {}", model.word_vector(word))?;
                }
            }
            OutputMode::Ngrams => {
                for word in line.split_whitespace() {
                    out.write_all(word.as_bytes())?;
                    for bucket in model.word_ngrams(word).iter() {
                        write!(&mut out, " {bucket}")?;
                    }
                    out.write_all(b"\n")?;
                }
            }
            OutputMode::Nn => {
                for word in line.split_whitespace() {
                    writeln!(&mut out, "Query word? {word}")?;
                    for neighbor in model.nearest_neighbors(word, args.k)? {
                        writeln!(&mut out, "{} {}", neighbor.word, neighbor.score)?;
                    }
                }
            }
            OutputMode::Similarity => {
                let words: Vec<&str> = line.split_whitespace().collect();
                match words.as_slice() {
                    [a, b] => writeln!(&mut out, "{a} {b} {}", model.similarity(a, b)?)?,
                    [] => {}
                    _ => eprintln!("Expected two words per line, got {}", words.len()),
                }
            }
        }
        if is_tty {
            out.flush()?;
        }
    }

    Ok(())
}
