use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use abundance_viewer::data::normalize::{SolarReference, LOG_EPSILON_ZERO_POINT};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

struct Row {
    id: String,
    unit: &'static str,
    ba: Option<f64>,
    eu: Option<f64>,
    la: Option<f64>,
    fe_h: Option<f64>,
    source: &'static str,
}

fn cell(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.3}")).unwrap_or_else(|| "x".to_string())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let solar = SolarReference::default();

    let mut rows = Vec::new();
    for i in 0..60 {
        let fe_h = rng.uniform(-3.0, -0.2);

        // r-process enhancement rises toward low metallicity; La tracks Ba.
        let eu = 0.35 - 0.15 * fe_h + rng.gauss(0.0, 0.15);
        let ba = 0.1 + 0.4 * (eu - 0.35) + rng.gauss(0.0, 0.2);
        let la = 0.05 + 0.8 * ba + rng.gauss(0.0, 0.1);

        let internal = rng.chance(0.4);
        let log_units = internal && rng.chance(0.7);
        let to_unit = |ratio: f64, reference: f64| {
            if log_units {
                ratio + LOG_EPSILON_ZERO_POINT + fe_h + reference
            } else {
                ratio
            }
        };

        rows.push(Row {
            id: format!("RG{:03}", i + 1),
            unit: if log_units { "logE" } else { "X/Fe" },
            ba: (!rng.chance(0.1)).then(|| to_unit(ba, solar.barium)),
            eu: (!rng.chance(0.25)).then(|| to_unit(eu, solar.europium)),
            la: (!rng.chance(0.3)).then(|| to_unit(la, solar.lanthanum)),
            fe_h: (!rng.chance(0.08)).then_some(fe_h),
            source: if internal { "I" } else { "E" },
        });
    }

    // Whitespace table
    let mut text = String::from("Star Units Ba Eu La FeH Source\n");
    for r in &rows {
        writeln!(
            text,
            "{} {} {} {} {} {} {}",
            r.id,
            r.unit,
            cell(r.ba),
            cell(r.eu),
            cell(r.la),
            cell(r.fe_h),
            r.source
        )?;
    }
    let text_path = "sample_stars.txt";
    std::fs::write(text_path, text).context("writing text table")?;

    // Parquet
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("unit", DataType::Utf8, false),
        Field::new("ba", DataType::Float64, true),
        Field::new("eu", DataType::Float64, true),
        Field::new("la", DataType::Float64, true),
        Field::new("fe_h", DataType::Float64, true),
        Field::new("source", DataType::Utf8, false),
    ]));

    let floats = |f: fn(&Row) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let strings = |f: fn(&Row) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let columns: Vec<ArrayRef> = vec![
        strings(|r| r.id.as_str()),
        strings(|r| r.unit),
        floats(|r| r.ba),
        floats(|r| r.eu),
        floats(|r| r.la),
        floats(|r| r.fe_h),
        strings(|r| r.source),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let parquet_path = "sample_stars.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    println!(
        "Wrote {} stars to {text_path} and {parquet_path}",
        rows.len()
    );
    Ok(())
}
