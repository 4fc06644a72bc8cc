use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::ResultEngine;

mod expenses;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// `?` inside the block ends the block, not the caller, so the rollback always runs.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {
        async {
            let $tx = $self.database.begin().await?;
            let result = async {
                let value: $crate::ResultEngine<_> = $body;
                value
            }
            .await;
            match result {
                Ok(value) => {
                    $tx.commit().await?;
                    Ok::<_, $crate::EngineError>(value)
                }
                Err(err) => {
                    if let Err(rollback_err) = $tx.rollback().await {
                        tracing::warn!("transaction rollback failed: {rollback_err}");
                    }
                    Err(err)
                }
            }
        }
        .await
    };
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Run a trivial statement to check the store is reachable.
    pub async fn ping(&self) -> ResultEngine<()> {
        self.database.execute_unprepared("SELECT 1").await?;
        Ok(())
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
