use anyhow::Result;
use rusqlite::Connection;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS medications (
            id           TEXT PRIMARY KEY,
            name         TEXT NOT NULL,
            dosage       TEXT NOT NULL DEFAULT '',
            frequency    TEXT NOT NULL,
            start_date   TEXT,
            end_date     TEXT,
            schedule     TEXT,
            instructions TEXT NOT NULL DEFAULT '',
            created_at   TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_medications_name ON medications(name);

        CREATE TABLE IF NOT EXISTS adherence_logs (
            id                TEXT PRIMARY KEY,
            medication_id     TEXT NOT NULL,
            medication_name   TEXT,
            medication_dosage TEXT,
            status            TEXT NOT NULL,
            scheduled_time    TEXT,
            taken_at          TEXT,
            created_at        TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_logs_medication ON adherence_logs(medication_id);
        CREATE INDEX IF NOT EXISTS idx_logs_created ON adherence_logs(created_at);

        CREATE TABLE IF NOT EXISTS reminders (
            id              TEXT PRIMARY KEY,
            medication_name TEXT NOT NULL,
            fire_time       TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );",
    )?;
    Ok(())
}
