//! 按凭证限制并发厂商调用数。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

pub struct CredentialLimiter {
    permits_per_credential: usize,
    semaphores: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl CredentialLimiter {
    pub fn new(permits_per_credential: usize) -> Self {
        Self {
            permits_per_credential: permits_per_credential.max(1),
            semaphores: Mutex::new(HashMap::new()),
        }
    }

    pub async fn acquire(&self, credential_id: &str) -> Option<OwnedSemaphorePermit> {
        let semaphore = {
            let mut semaphores = self
                .semaphores
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            semaphores
                .entry(credential_id.to_string())
                .or_insert_with(|| Arc::new(Semaphore::new(self.permits_per_credential)))
                .clone()
        };
        semaphore.acquire_owned().await.ok()
    }
}
