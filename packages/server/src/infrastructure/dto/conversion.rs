//! Conversion logic between domain entities and DTOs.

use irori_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::Participant;
use crate::infrastructure::dto::http::{ParticipantDetailDto, ParticipantsDto};

impl From<&Participant> for ParticipantDetailDto {
    fn from(model: &Participant) -> Self {
        Self {
            display_name: model.display_name.as_str().to_string(),
            connections: model.connections.len(),
            joined_at: timestamp_to_jst_rfc3339(model.joined_at.value()),
        }
    }
}

impl From<Vec<Participant>> for ParticipantsDto {
    fn from(models: Vec<Participant>) -> Self {
        let participants: Vec<ParticipantDetailDto> =
            models.iter().map(ParticipantDetailDto::from).collect();
        Self {
            count: participants.len(),
            participants,
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::{Connection, ConnectionIdFactory, DisplayName, ParticipantId, Timestamp};

    #[test]
    fn test_participant_to_dto() {
        // テスト項目: 参加者エンティティが DTO に変換され、セッション ID は含まれない
        // given (前提条件):
        let id = ParticipantId::new("secret-session".to_string()).unwrap();
        let mut participant = Participant::new(
            id.clone(),
            DisplayName::numbered(1),
            Timestamp::new(1672498800000),
        );
        let (tx, _rx) = mpsc::unbounded_channel();
        participant
            .connections
            .insert(Connection::new(ConnectionIdFactory::generate(), id, tx));

        // when (操作):
        let dto = ParticipantsDto::from(vec![participant]);

        // then (期待する結果):
        assert_eq!(dto.count, 1);
        assert_eq!(dto.participants[0].display_name, "user1");
        assert_eq!(dto.participants[0].connections, 1);
        assert!(dto.participants[0].joined_at.starts_with("2023-01-01T00:00:00"));
        let json = serde_json::to_string(&dto).unwrap();
        assert!(!json.contains("secret-session"));
    }
}
