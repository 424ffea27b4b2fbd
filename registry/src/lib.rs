use std::sync::Arc;

use adapter::{
    database::ConnectionPool,
    remote::{channel::ChannelClient, ical_feed::IcalFeedClient},
    repository::{health::HealthCheckRepositoryImpl, reservation::ReservationRepositoryImpl},
};
use kernel::{
    repository::{
        calendar_feed::CalendarFeedRepository, channel::ChannelRepository,
        health::HealthCheckRepository, reservation::ReservationRepository,
    },
    service::{
        availability::AvailabilityService, booking::ReservationWriteGuard,
        publisher::CalendarPublisher,
    },
};
use shared::{config::AppConfig, error::AppResult};

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    calendar_feed_repository: Arc<dyn CalendarFeedRepository>,
    channel_repository: Arc<dyn ChannelRepository>,
    availability_service: AvailabilityService,
    write_guard: ReservationWriteGuard,
    calendar_publisher: CalendarPublisher,
    config: Arc<AppConfig>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: AppConfig) -> AppResult<Self> {
        let calendar = Arc::new(app_config.calendar.clone());

        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let reservation_repository: Arc<dyn ReservationRepository> =
            Arc::new(ReservationRepositoryImpl::new(pool.clone()));
        let calendar_feed_repository: Arc<dyn CalendarFeedRepository> =
            Arc::new(IcalFeedClient::new(&calendar)?);
        let channel_repository: Arc<dyn ChannelRepository> =
            Arc::new(ChannelClient::new(calendar.clone())?);

        let availability_service = AvailabilityService::new(
            reservation_repository.clone(),
            calendar_feed_repository.clone(),
            calendar,
        );
        let write_guard = ReservationWriteGuard::new(
            availability_service.clone(),
            reservation_repository.clone(),
            channel_repository.clone(),
        );
        let calendar_publisher = CalendarPublisher::new(reservation_repository.clone());

        Ok(Self {
            health_check_repository,
            reservation_repository,
            calendar_feed_repository,
            channel_repository,
            availability_service,
            write_guard,
            calendar_publisher,
            config: Arc::new(app_config),
        })
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn calendar_feed_repository(&self) -> Arc<dyn CalendarFeedRepository> {
        self.calendar_feed_repository.clone()
    }

    pub fn channel_repository(&self) -> Arc<dyn ChannelRepository> {
        self.channel_repository.clone()
    }

    pub fn availability_service(&self) -> AvailabilityService {
        self.availability_service.clone()
    }

    pub fn write_guard(&self) -> ReservationWriteGuard {
        self.write_guard.clone()
    }

    pub fn calendar_publisher(&self) -> CalendarPublisher {
        self.calendar_publisher.clone()
    }

    pub fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }
}
