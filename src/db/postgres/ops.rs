use tokio_postgres::Row;

use crate::db::models::OrderRecord;
use crate::db::postgres::PostgresClient;

/// Shared column list + join for successful orders.
///
/// An order is successful only when both the source and destination swap
/// carry a non-empty redeem transaction hash; that invariant lives here,
/// in SQL, so callers never see half-settled orders.
const SUCCESSFUL_ORDERS_SELECT: &str = r#"
    SELECT
        co.create_id,
        co.source_chain, co.source_asset,
        co.destination_chain, co.destination_asset,
        co.source_amount::text AS source_amount,
        co.destination_amount::text AS destination_amount,
        co.input_token_price, co.output_token_price,
        co.created_at
    FROM matched_orders mo
    JOIN create_orders co ON co.create_id = mo.create_order_id
    JOIN swaps ss ON ss.swap_id = mo.source_swap_id
    JOIN swaps ds ON ds.swap_id = mo.destination_swap_id
    WHERE COALESCE(ss.redeem_tx_hash, '') <> ''
      AND COALESCE(ds.redeem_tx_hash, '') <> ''
"#;

fn row_to_order(row: &Row) -> OrderRecord {
    // Lowercase chain/asset identifiers for consistent grouping
    let source_chain: String = row.get("source_chain");
    let source_asset: String = row.get("source_asset");
    let destination_chain: String = row.get("destination_chain");
    let destination_asset: String = row.get("destination_asset");

    OrderRecord {
        create_id: row.get("create_id"),
        source_chain: source_chain.to_lowercase(),
        source_asset: source_asset.to_lowercase(),
        destination_chain: destination_chain.to_lowercase(),
        destination_asset: destination_asset.to_lowercase(),
        source_amount: row.get("source_amount"),
        destination_amount: row.get("destination_amount"),
        input_token_price: row.get("input_token_price"),
        output_token_price: row.get("output_token_price"),
        created_at: row.get("created_at"),
    }
}

impl PostgresClient {
    // ==================== ORDERS ====================

    /// Get all successful orders (both legs redeemed), oldest first.
    pub async fn get_successful_orders(&self) -> anyhow::Result<Vec<OrderRecord>> {
        let client = self.pool.get().await?;
        let query = format!("{} ORDER BY co.created_at ASC", SUCCESSFUL_ORDERS_SELECT);

        let rows = client.query(&query, &[]).await?;
        Ok(rows.iter().map(row_to_order).collect())
    }

    /// Get successful orders created in the last `hours` hours, oldest first.
    pub async fn get_successful_orders_since(
        &self,
        hours: i32,
    ) -> anyhow::Result<Vec<OrderRecord>> {
        let client = self.pool.get().await?;
        let query = format!(
            "{} AND co.created_at >= NOW() - make_interval(hours => $1) ORDER BY co.created_at ASC",
            SUCCESSFUL_ORDERS_SELECT
        );

        let rows = client.query(&query, &[&hours]).await?;
        Ok(rows.iter().map(row_to_order).collect())
    }

    // ==================== COUNTS ====================

    /// Total matched order count, regardless of settlement outcome.
    pub async fn count_matched_orders(&self) -> anyhow::Result<u64> {
        let client = self.pool.get().await?;
        let row = client
            .query_one("SELECT COUNT(*) FROM matched_orders", &[])
            .await?;
        let count: i64 = row.get(0);
        Ok(count as u64)
    }

    /// Total successful (both legs redeemed) order count.
    pub async fn count_successful_orders(&self) -> anyhow::Result<u64> {
        let client = self.pool.get().await?;
        let query = r#"
            SELECT COUNT(*)
            FROM matched_orders mo
            JOIN swaps ss ON ss.swap_id = mo.source_swap_id
            JOIN swaps ds ON ds.swap_id = mo.destination_swap_id
            WHERE COALESCE(ss.redeem_tx_hash, '') <> ''
              AND COALESCE(ds.redeem_tx_hash, '') <> ''
        "#;
        let row = client.query_one(query, &[]).await?;
        let count: i64 = row.get(0);
        Ok(count as u64)
    }

    /// Distinct initiator (wallet) count across all created orders.
    pub async fn count_distinct_initiators(&self) -> anyhow::Result<u64> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "SELECT COUNT(DISTINCT initiator_source_address) FROM create_orders",
                &[],
            )
            .await?;
        let count: i64 = row.get(0);
        Ok(count as u64)
    }
}
