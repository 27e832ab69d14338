//! Collection select/insert/update/delete over HTTP.

use super::*;

impl CollectionStore for ScopedClient {
    fn select(&self, collection: &str) -> Result<Vec<Record>> {
        let resp = self
            .authorize(
                self.client
                    .get(self.url(&format!("/collections/{}", collection)))
                    .query(&[("order", "created_at.desc")]),
            )
            .send()
            .with_context(|| format!("select {}", collection))?;
        let rows: Vec<Record> = self
            .ensure_ok(resp, &format!("select {}", collection))?
            .json()
            .with_context(|| format!("parse {} rows", collection))?;
        Ok(rows)
    }

    fn update(
        &self,
        collection: &str,
        ids: &[RecordId],
        fields: &Map<String, Value>,
    ) -> Result<Vec<RecordId>> {
        let resp = self
            .authorize(
                self.client
                    .patch(self.url(&format!("/collections/{}", collection)))
                    .json(&UpdateRequest { ids, fields }),
            )
            .send()
            .with_context(|| format!("update {}", collection))?;
        let out: AffectedResponse = self
            .ensure_ok(resp, &format!("update {}", collection))?
            .json()
            .context("parse update response")?;
        Ok(out.affected)
    }

    fn delete(&self, collection: &str, ids: &[RecordId]) -> Result<Vec<RecordId>> {
        let resp = self
            .authorize(
                self.client
                    .delete(self.url(&format!("/collections/{}", collection)))
                    .json(&IdsRequest { ids }),
            )
            .send()
            .with_context(|| format!("delete {}", collection))?;
        let out: AffectedResponse = self
            .ensure_ok(resp, &format!("delete {}", collection))?
            .json()
            .context("parse delete response")?;
        Ok(out.affected)
    }

    fn insert(&self, collection: &str, fields: Map<String, Value>) -> Result<Record> {
        let resp = self
            .authorize(
                self.client
                    .post(self.url(&format!("/collections/{}", collection)))
                    .json(&fields),
            )
            .send()
            .with_context(|| format!("insert {}", collection))?;
        let row: Record = self
            .ensure_ok(resp, &format!("insert {}", collection))?
            .json()
            .context("parse inserted row")?;
        Ok(row)
    }
}
