// src/services/share_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::DealRepository,
    models::party::{ShareUpdate, SharesUpdatedResponse},
};

// Persistência das participações (owner-shares / investor-shares).
// O cliente manda percentual e valor já arredondados; aqui só entra a
// revalidação de faixa, porque quem chama não é confiável (defesa em
// profundidade, a mesma regra do alocador).

#[derive(Clone)]
pub struct ShareService {
    repo: DealRepository,
    pool: PgPool,
}

enum ShareTarget {
    Owners,
    Investors,
}

impl ShareService {
    pub fn new(repo: DealRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn update_owner_shares(
        &self,
        deal_id: i64,
        shares: &[ShareUpdate],
    ) -> Result<SharesUpdatedResponse, AppError> {
        self.update_shares(deal_id, shares, ShareTarget::Owners)
            .await
    }

    pub async fn update_investor_shares(
        &self,
        deal_id: i64,
        shares: &[ShareUpdate],
    ) -> Result<SharesUpdatedResponse, AppError> {
        self.update_shares(deal_id, shares, ShareTarget::Investors)
            .await
    }

    async fn update_shares(
        &self,
        deal_id: i64,
        shares: &[ShareUpdate],
        target: ShareTarget,
    ) -> Result<SharesUpdatedResponse, AppError> {
        if shares.is_empty() {
            return Err(AppError::BadRequest("No shares provided.".to_string()));
        }
        if !self.repo.exists(deal_id).await? {
            return Err(AppError::DealNotFound);
        }

        // Uma transação para o lote inteiro: ou todas as linhas válidas
        // entram, ou nenhuma.
        let mut tx = self.pool.begin().await?;
        let mut updated = 0usize;

        for share in shares {
            // Clamp de faixa no servidor. A soma dos percentuais NÃO é
            // validada de propósito: alocação parcial é permitida e o
            // total divergente de 100 é só um aviso na tela.
            let percentage = Decimal::from(share.percentage_share)
                .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

            // Parte que não pertence ao negócio é ignorada em silêncio,
            // como no comportamento original.
            let applied = match target {
                ShareTarget::Owners => {
                    self.repo
                        .update_owner_share(&mut *tx, deal_id, share, percentage)
                        .await?
                }
                ShareTarget::Investors => {
                    self.repo
                        .update_investor_share(&mut *tx, deal_id, share, percentage)
                        .await?
                }
            };
            if applied {
                updated += 1;
            }
        }

        tx.commit().await?;

        tracing::info!(
            "✅ Participações atualizadas: negócio {}, {} de {} linhas",
            deal_id,
            updated,
            shares.len()
        );

        Ok(SharesUpdatedResponse {
            success: true,
            message: format!("Updated {updated} shares successfully"),
            updated,
        })
    }
}
