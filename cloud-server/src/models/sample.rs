//! Sample model

use sqlx::{PgPool, Postgres, QueryBuilder};

use solarwatch_core::Sample;

/// Rows per INSERT statement, well under the bind parameter limit
const UPSERT_CHUNK: usize = 1000;

pub struct SampleRow;

impl SampleRow {
    pub async fn upsert_many(pool: &PgPool, samples: &[Sample]) -> Result<u64, sqlx::Error> {
        let mut affected = 0;

        for chunk in samples.chunks(UPSERT_CHUNK) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO samples (time, density, speed, temperature, bx_gsm, by_gsm, bz_gsm) ");

            builder.push_values(chunk, |mut row, sample| {
                row.push_bind(sample.time.as_str())
                    .push_bind(sample.plasma.density)
                    .push_bind(sample.plasma.speed)
                    .push_bind(sample.plasma.temperature)
                    .push_bind(sample.field.bx)
                    .push_bind(sample.field.by)
                    .push_bind(sample.field.bz);
            });

            builder.push(
                " ON CONFLICT (time) DO UPDATE SET \
                 density = EXCLUDED.density, speed = EXCLUDED.speed, \
                 temperature = EXCLUDED.temperature, bx_gsm = EXCLUDED.bx_gsm, \
                 by_gsm = EXCLUDED.by_gsm, bz_gsm = EXCLUDED.bz_gsm, recorded_at = NOW()",
            );

            affected += builder.build().execute(pool).await?.rows_affected();
        }

        Ok(affected)
    }
}
