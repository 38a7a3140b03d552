use anyhow::{anyhow, bail, Context};
use clap::{Parser, ValueEnum};
use std::io::Write;
use ycomb::{fix, fix_memo, recursive, FnLike, Rec};

mod fast_io {
    use std::io::{BufReader, Read};

    pub trait InputStream {
        fn token(&mut self) -> Option<&[u8]>;
    }

    // cheap whitespace check
    fn is_whitespace(c: u8) -> bool {
        c <= b' '
    }

    pub struct InputAtOnce {
        buf: Box<[u8]>,
        cursor: usize,
    }

    impl InputAtOnce {
        pub fn new(buf: Box<[u8]>) -> Self {
            Self { buf, cursor: 0 }
        }

        fn take(&mut self, n: usize) -> &[u8] {
            let n = n.min(self.buf.len() - self.cursor);
            let slice = &self.buf[self.cursor..self.cursor + n];
            self.cursor += n;
            slice
        }
    }

    impl InputStream for InputAtOnce {
        fn token(&mut self) -> Option<&[u8]> {
            let skip = self.buf[self.cursor..]
                .iter()
                .position(|&c| !is_whitespace(c))?;
            self.take(skip);
            let len = self.buf[self.cursor..]
                .iter()
                .position(|&c| is_whitespace(c))
                .unwrap_or_else(|| self.buf.len() - self.cursor);
            Some(self.take(len))
        }
    }

    pub fn stdin_at_once() -> std::io::Result<InputAtOnce> {
        let mut reader = BufReader::new(std::io::stdin().lock());
        let mut buf: Vec<u8> = vec![];
        reader.read_to_end(&mut buf)?;
        Ok(InputAtOnce::new(buf.into_boxed_slice()))
    }
}

const STACK_SIZE: usize = 256 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Func {
    Fact,
    Fib,
    Sum,
    Ackermann,
}

/// Evaluate sample functions built from anonymous recursive closures.
#[derive(Debug, Parser)]
struct Args {
    /// Cache results of recursive calls
    #[arg(long)]
    memo: bool,

    func: Func,

    /// Inputs; read from stdin when omitted. `ackermann` takes pairs `M N`
    values: Vec<u64>,
}

fn parse_values(input: &mut impl fast_io::InputStream) -> anyhow::Result<Vec<u64>> {
    let mut values = vec![];
    while let Some(token) = input.token() {
        let token = std::str::from_utf8(token).context("input is not utf-8")?;
        values.push(
            token
                .parse()
                .with_context(|| format!("invalid input {token:?}"))?,
        );
    }
    Ok(values)
}

// None on u128 overflow
type Eval<A> = Box<dyn FnMut(A) -> Option<u128>>;

fn unary(func: Func, memo: bool) -> Eval<u64> {
    match (func, memo) {
        (Func::Fact, _) => {
            let fact = ycomb::recursive!(|fact, n: u64| -> Option<u128> {
                if n == 0 {
                    Some(1)
                } else {
                    fact(n - 1)?.checked_mul(n as u128)
                }
            });
            Box::new(move |n| fact(n))
        }
        (Func::Fib, false) => {
            let fib = recursive(|fib: Rec<u64, Option<u128>>| {
                move |n: u64| -> Option<u128> {
                    if n < 2 {
                        Some(n as u128)
                    } else {
                        fib(n - 1)?.checked_add(fib(n - 2)?)
                    }
                }
            });
            Box::new(move |n| fib(n))
        }
        (Func::Fib, true) => Box::new(fix_memo(
            |fib: &mut dyn FnMut(u64) -> Option<u128>, n: u64| -> Option<u128> {
                if n < 2 {
                    Some(n as u128)
                } else {
                    let a = fib(n - 1)?;
                    a.checked_add(fib(n - 2)?)
                }
            },
        )),
        (Func::Sum, false) => Box::new(fix(
            |sum: &dyn FnLike<u64, Option<u128>>, n: u64| -> Option<u128> {
                if n == 0 {
                    Some(0)
                } else {
                    sum.call(n - 1)?.checked_add(n as u128)
                }
            },
        )),
        (Func::Sum, true) => Box::new(fix_memo(
            |sum: &mut dyn FnMut(u64) -> Option<u128>, n: u64| -> Option<u128> {
                if n == 0 {
                    Some(0)
                } else {
                    sum(n - 1)?.checked_add(n as u128)
                }
            },
        )),
        (Func::Ackermann, _) => unreachable!("ackermann is binary"),
    }
}

fn ackermann(memo: bool) -> Eval<(u64, u64)> {
    if memo {
        Box::new(fix_memo(
            |ack: &mut dyn FnMut((u64, u64)) -> Option<u128>, (m, n): (u64, u64)| -> Option<u128> {
                match (m, n) {
                    (0, n) => (n as u128).checked_add(1),
                    (m, 0) => ack((m - 1, 1)),
                    (m, n) => {
                        let inner = u64::try_from(ack((m, n - 1))?).ok()?;
                        ack((m - 1, inner))
                    }
                }
            },
        ))
    } else {
        Box::new(fix(
            |ack: &dyn FnLike<(u64, u64), Option<u128>>, (m, n): (u64, u64)| -> Option<u128> {
                match (m, n) {
                    (0, n) => (n as u128).checked_add(1),
                    (m, 0) => ack.call((m - 1, 1)),
                    (m, n) => {
                        let inner = u64::try_from(ack.call((m, n - 1))?).ok()?;
                        ack.call((m - 1, inner))
                    }
                }
            },
        ))
    }
}

fn run(func: Func, memo: bool, values: &[u64], output: &mut impl Write) -> anyhow::Result<()> {
    let mut overflowed = 0;
    let mut report = |label: String, res: Option<u128>| -> std::io::Result<()> {
        match res {
            Some(v) => writeln!(output, "{v}"),
            None => {
                log::error!("{label} overflows u128");
                overflowed += 1;
                writeln!(output, "overflow")
            }
        }
    };

    if func == Func::Ackermann {
        if values.len() % 2 != 0 {
            bail!("ackermann takes pairs `M N`, got {} values", values.len());
        }
        let mut eval = ackermann(memo);
        for pair in values.chunks(2) {
            let (m, n) = (pair[0], pair[1]);
            report(format!("ackermann({m}, {n})"), eval((m, n)))?;
        }
    } else {
        let mut eval = unary(func, memo);
        for &n in values {
            report(format!("{func:?}({n})"), eval(n))?;
        }
    }
    output.flush()?;

    if overflowed > 0 {
        bail!("{overflowed} of the inputs overflowed");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let values = if args.values.is_empty() {
        let mut input = fast_io::stdin_at_once().context("failed to read stdin")?;
        parse_values(&mut input)?
    } else {
        args.values
    };
    log::debug!("evaluating {:?} on {} values, memo: {}", args.func, values.len(), args.memo);

    let (func, memo) = (args.func, args.memo);
    // deep recursion on large inputs
    std::thread::Builder::new()
        .stack_size(STACK_SIZE)
        .spawn(move || {
            let mut output = std::io::BufWriter::new(std::io::stdout().lock());
            run(func, memo, &values, &mut output)
        })?
        .join()
        .map_err(|_| anyhow!("evaluation panicked"))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_all(func: Func, memo: bool, values: &[u64]) -> (String, bool) {
        let mut output = vec![];
        let ok = run(func, memo, values, &mut output).is_ok();
        (String::from_utf8(output).unwrap(), ok)
    }

    #[test]
    fn test_parse_values() {
        let mut input = fast_io::InputAtOnce::new(b" 5 10\r\n 0\n\n20 ".to_vec().into_boxed_slice());
        assert_eq!(parse_values(&mut input).unwrap(), [5, 10, 0, 20]);

        let mut input = fast_io::InputAtOnce::new(b"5 x".to_vec().into_boxed_slice());
        assert!(parse_values(&mut input).is_err());
    }

    #[test]
    fn test_run() {
        assert_eq!(eval_all(Func::Fact, false, &[5, 0]), ("120\n1\n".to_string(), true));
        assert_eq!(eval_all(Func::Fib, false, &[10]), ("55\n".to_string(), true));
        assert_eq!(eval_all(Func::Fib, true, &[10, 90]), ("55\n2880067194370816120\n".to_string(), true));
        assert_eq!(eval_all(Func::Sum, false, &[100]), ("5050\n".to_string(), true));
        assert_eq!(eval_all(Func::Sum, true, &[100]), ("5050\n".to_string(), true));
        assert_eq!(eval_all(Func::Ackermann, false, &[2, 3]), ("9\n".to_string(), true));
        assert_eq!(eval_all(Func::Ackermann, true, &[2, 3, 3, 3]), ("9\n61\n".to_string(), true));
    }

    #[test]
    fn test_run_overflow() {
        // 34! < 2^128 < 35!
        assert_eq!(eval_all(Func::Fact, false, &[34, 35]).1, false);
        assert_eq!(eval_all(Func::Fact, false, &[34]).1, true);
        assert!(eval_all(Func::Fact, false, &[40]).0.ends_with("overflow\n"));
        assert_eq!(eval_all(Func::Ackermann, false, &[1]).1, false);
    }
}
