// src/db/kv.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::common::error::AppError;

// Contrato do armazém chave-valor. Atômico por chave; não existe transação
// multi-chave, e uma varredura de prefixo não enxerga um snapshot consistente
// entre chaves.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, AppError>;
}

// --- BACKEND POSTGRES ---

// Uma tabela só: key TEXT PRIMARY KEY, value JSONB. O schema é criado pela
// migration embutida (ver migrations/).
#[derive(Clone)]
pub struct PgKvStore {
    pool: PgPool,
}

impl PgKvStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KvStore for PgKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        let value = sqlx::query_scalar::<_, Value>("SELECT value FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), AppError> {
        // UPSERT: gravar de novo na mesma chave substitui o valor inteiro.
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key)
            DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM kv_store WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, AppError> {
        let values =
            sqlx::query_scalar::<_, Value>("SELECT value FROM kv_store WHERE key LIKE $1 ORDER BY key")
                .bind(format!("{}%", prefix))
                .fetch_all(&self.pool)
                .await?;
        Ok(values)
    }
}

// --- BACKEND EM MEMÓRIA ---

// Usado nos testes de integração e em desenvolvimento local
// (KV_BACKEND=memory). BTreeMap garante a varredura de prefixo ordenada,
// igual ao LIKE + ORDER BY do Postgres.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), AppError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, AppError> {
        let entries = self.entries.read().await;
        let values = entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, value)| value.clone())
            .collect();
        Ok(values)
    }
}
