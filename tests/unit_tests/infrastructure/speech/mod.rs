mod command_audio_player_test;
